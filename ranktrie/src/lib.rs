//! # ranktrie
//!
//! ranktrieは、頻度順位付きトライによる英単語の入力補完の実装です。
//!
//! ## 概要
//!
//! 頻度順に並んだ単語リストからトライを構築し、各ノードにそのノード以下の
//! 単語の最小順位を持たせます。このトライを幅優先順に平坦化したコンパクトな
//! バイナリ形式で保存し、読み込み後は読み取り専用のまま複数のスレッドで共有できます。
//!
//! ## 主な機能
//!
//! - **接頭辞補完**: 最小順位による最良優先探索で、頻度の高い単語から返す
//! - **あいまい検索**: 編集距離による打ち間違いの修正候補
//! - **セッション**: 接頭辞キャッシュと、古いクエリのキャンセル
//! - **コンパクトな形式**: パック済みノード、可変長整数の順位、Zstandard圧縮
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ranktrie::{Dictionary, Suggester, TrieBuilder};
//!
//! // The most frequent word comes first.
//! let words = "the\nthere\ntheir\nwhere\n";
//! let image = TrieBuilder::from_reader(words.as_bytes())?.build()?;
//! let dict = Dictionary::from_bytes(&image.to_bytes())?;
//!
//! let suggester = Suggester::new(dict);
//! assert_eq!(suggester.prefix_suggest("the", 3), ["the", "there", "their"]);
//! assert_eq!(suggester.fuzzy_suggest("tere", 3, 2), ["there", "the", "where"]);
//! assert!(suggester.is_word("their"));
//! assert!(!suggester.is_word("thei"));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 協調的キャンセル
pub mod cancel;

/// 検索の設定
pub mod config;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 数値型のユーティリティ
pub mod num;

/// 入力セッション単位の補完エンジン
pub mod session;

/// 補完候補の検索
pub mod suggester;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use cancel::{CancelSource, CancelToken};
pub use config::SearchConfig;
pub use dictionary::{Dictionary, TrieBuilder, TrieImage};
pub use errors::{RankTrieError, Result};
pub use session::{Engine, PendingSuggestions, Suggestions};
pub use suggester::worker::Worker;
pub use suggester::{FuzzyMatch, PrefixMatch, Suggester};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
