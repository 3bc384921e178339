//! エラー型の定義
//!
//! このモジュールは、ranktrieで使用されるすべてのエラー型を定義します。
//! ビルド時のエラー([`BuildError`])、読み込み時のフォーマットエラー
//! ([`InvalidFormatError`])、クエリのキャンセル([`RankTrieError::Cancelled`])を区別します。

use std::error::Error;
use std::fmt::{self, Debug};

/// ranktrie専用のResult型
///
/// エラー型としてデフォルトで[`RankTrieError`]を使用します。
pub type Result<T, E = RankTrieError> = std::result::Result<T, E>;

/// ranktrieのエラー型
#[derive(Debug, thiserror::Error)]
pub enum RankTrieError {
    /// トライ構築エラー
    ///
    /// [`BuildError`]のエラーバリアント。出力ファイルは書き込まれません。
    #[error(transparent)]
    Build(#[from] BuildError),

    /// 無効なフォーマットエラー
    ///
    /// バイナリの読み込み時に検出される破損・切り詰め。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な引数エラー
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// クエリが新しいクエリによって置き換えられた
    ///
    /// 失敗ではありません。呼び出し側は結果を黙って破棄します。
    #[error("the query was superseded by a newer one")]
    Cancelled,

    /// バックグラウンドスレッドパニックエラー
    #[error("Background thread panicked: {0}")]
    ThreadPanic(String),

    /// 整数変換エラー
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}

impl RankTrieError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 破損が見つかった領域の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// キャンセルによるエラーかどうかを返します。
    ///
    /// キャンセルはユーザーに見せるべきエラーではないため、
    /// 呼び出し側はこのメソッドで判定して結果を破棄します。
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// トライ構築時のエラー
///
/// いずれもバイナリフォーマットの固定ビット幅による容量制限、
/// または入力語彙の不備に起因し、ビルドは中断されます。
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 有効な単語が1つもない
    #[error("the vocabulary contains no usable words")]
    EmptyVocabulary,

    /// 順位が番兵値に達した
    #[error("rank {rank} does not fit below the sentinel {sentinel}")]
    RankOverflow {
        /// 単語の順位
        rank: u32,
        /// 番兵値
        sentinel: u32,
    },

    /// ノード数が子インデックスのビット幅を超えた
    #[error("the trie has {count} nodes but at most {max} can be addressed")]
    TooManyNodes {
        /// ノード数
        count: usize,
        /// 最大ノード数
        max: usize,
    },

    /// 子ノード数が子数フィールドのビット幅を超えた
    #[error("a node has {count} children but at most {max} are allowed")]
    TooManyChildren {
        /// 子ノード数
        count: usize,
        /// 最大子ノード数
        max: usize,
    },

    /// 文字コードが文字コードフィールドに収まらない
    #[error("character code {code} does not fit in the character field")]
    InvalidCharCode {
        /// 文字コード
        code: u32,
    },
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力バイナリのフォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// 破損が見つかった領域の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl InvalidFormatError {
    /// 破損が見つかった領域の名前を返します。
    pub fn section(&self) -> &'static str {
        self.arg
    }
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}
