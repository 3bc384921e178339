//! トライの検証モジュール
//!
//! 構築済みのトライを読み込んで統計情報を表示し、単語リストが与えられた場合は
//! すべての単語がその順位のまま復元できることを確認します。

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use ranktrie::errors::RankTrieError;
use ranktrie::{Dictionary, TrieBuilder};

use clap::Parser;

use crate::build::is_zstd_path;

/// 検証コマンドの引数
#[derive(Parser, Debug)]
#[clap(
    name = "verify",
    about = "A program to inspect and verify a compiled ranked trie."
)]
pub struct Args {
    /// Compiled trie (zstd-compressed when the path ends with `.zst`).
    #[clap(short = 'i', long)]
    trie_in: PathBuf,

    /// Word list the trie was built from, to check the round trip.
    #[clap(short = 'w', long)]
    words_in: Option<PathBuf>,
}

/// 検証処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// 単語リストとトライの内容が一致しない
    #[error("Round trip mismatch: {0}")]
    Mismatch(String),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 読み込みエラー
    #[error("Loading the trie failed: {0}")]
    RankTrie(#[from] RankTrieError),
}

/// 検証コマンドを実行する
///
/// # エラー
///
/// トライが読み込めない場合、または単語リストと一致しない場合に`VerifyError`を返します。
pub fn run(args: Args) -> Result<(), VerifyError> {
    println!("Loading the trie...");
    let dict = if is_zstd_path(&args.trie_in) {
        Dictionary::from_zstd(&args.trie_in)?
    } else {
        Dictionary::from_path(&args.trie_in)?
    };

    let words = dict.words();
    let num_end_of_word = words.len();
    let max_rank = words.iter().map(|&(_, r)| r).max().unwrap_or(0);
    println!("nodes: {}", dict.num_nodes());
    println!("words: {num_end_of_word}");
    println!("max rank: {max_rank}");

    if let Some(words_in) = &args.words_in {
        println!("Checking the round trip against {}...", words_in.display());
        let builder = TrieBuilder::from_reader(BufReader::new(File::open(words_in)?))?;
        let expected = Dictionary::from_bytes(&builder.build().map_err(RankTrieError::from)?.to_bytes())?;
        check_round_trip(&expected.words(), &words)?;
        println!("All {num_end_of_word} words round-trip with their ranks");
    }
    Ok(())
}

/// 2つの単語一覧が順位も含めて一致することを確認する
fn check_round_trip(expected: &[(String, u32)], actual: &[(String, u32)]) -> Result<(), VerifyError> {
    if expected.len() != actual.len() {
        return Err(VerifyError::Mismatch(format!(
            "expected {} words, found {}",
            expected.len(),
            actual.len()
        )));
    }
    for ((ew, er), (aw, ar)) in expected.iter().zip(actual) {
        if ew != aw || er != ar {
            return Err(VerifyError::Mismatch(format!(
                "expected {ew:?} at rank {er}, found {aw:?} at rank {ar}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_verify_round_trip() {
        let dir = tempdir().unwrap();
        let words = dir.path().join("words.txt");
        std::fs::write(&words, "the\nthere\ntheir\nwhere\n").unwrap();
        let trie = dir.path().join("trie.bin");
        TrieBuilder::from_words(["the", "there", "their", "where"])
            .build()
            .unwrap()
            .write_to_path(&trie)
            .unwrap();

        run(Args {
            trie_in: trie.clone(),
            words_in: Some(words.clone()),
        })
        .unwrap();

        std::fs::write(&words, "the\ntheir\nthere\nwhere\n").unwrap();
        let err = run(Args {
            trie_in: trie,
            words_in: Some(words),
        })
        .unwrap_err();
        assert!(matches!(err, VerifyError::Mismatch(_)));
    }

    #[test]
    fn test_verify_corrupt_file() {
        let dir = tempdir().unwrap();
        let trie = dir.path().join("trie.bin");
        std::fs::write(&trie, [0u8; 5]).unwrap();
        let err = run(Args {
            trie_in: trie,
            words_in: None,
        })
        .unwrap_err();
        assert!(matches!(err, VerifyError::RankTrie(RankTrieError::InvalidFormat(_))));
    }
}
