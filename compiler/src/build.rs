//! トライのビルドモジュール
//!
//! このモジュールは、頻度順に並んだ単語リストからバイナリ形式のトライを
//! 構築する機能を提供します。出力パスが`.zst`で終わる場合はZstandardで圧縮します。

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use ranktrie::errors::RankTrieError;
use ranktrie::{TrieBuilder, TrieImage};

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(
    name = "build",
    about = "A program to build a ranked trie from a word list."
)]
pub struct Args {
    /// Word list with one word per line, most frequent first.
    #[clap(short = 'w', long)]
    words_in: PathBuf,

    /// File to which the binary trie is output.
    ///
    /// The output is compressed with zstd when the path ends with `.zst`.
    #[clap(short = 'o', long)]
    trie_out: PathBuf,

    /// Compression level used for `.zst` outputs.
    #[clap(long, default_value_t = 19)]
    zstd_level: i32,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 単語リストが存在しない
    #[error("Word list not found: {}", .0.display())]
    MissingWordList(PathBuf),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// トライ構築エラー
    #[error("Trie building failed: {0}")]
    RankTrie(#[from] RankTrieError),
}

impl From<ranktrie::errors::BuildError> for BuildError {
    fn from(e: ranktrie::errors::BuildError) -> Self {
        Self::RankTrie(e.into())
    }
}

/// ビルドコマンドを実行する
///
/// 単語リストからトライを構築し、ノード数と各バッファのサイズを表示してから出力します。
/// 構築に失敗した場合、出力パスには何も書き込まれません。
///
/// # エラー
///
/// 単語リストの読み込み、トライの構築、出力の書き込みに失敗した場合、
/// `BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    println!("Compiling the trie...");
    let image = build_trie(&args.words_in)?;
    println!(
        "{} nodes (structure: {} bytes, pointers: {} bytes, ranks: {} bytes)",
        image.num_nodes(),
        image.structure_len(),
        image.pointer_len(),
        image.rank_len(),
    );

    println!("Writing the trie...");
    if is_zstd_path(&args.trie_out) {
        image.write_zstd_to_path(&args.trie_out, args.zstd_level)?;
    } else {
        image.write_to_path(&args.trie_out)?;
    }

    println!("Successfully built the trie to {}", args.trie_out.display());
    Ok(())
}

/// 単語リストからトライを構築する
///
/// CLIに依存しないコアのビルドロジックです。
///
/// # エラー
///
/// 単語リストが存在しない場合は`BuildError::MissingWordList`を返します。
pub fn build_trie(words_in: &Path) -> Result<TrieImage, BuildError> {
    let file = File::open(words_in).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BuildError::MissingWordList(words_in.to_path_buf()),
        _ => BuildError::Io(e),
    })?;
    let builder = TrieBuilder::from_reader(BufReader::new(file))?;
    log::info!("read {} distinct words from {}", builder.num_words(), words_in.display());
    Ok(builder.build()?)
}

/// 出力パスが`.zst`拡張子を持つかどうか
pub(crate) fn is_zstd_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "zst")
}
