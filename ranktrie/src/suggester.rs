//! 頻度順位付きトライによる補完候補の検索。
//!
//! このモジュールは、接頭辞補完とあいまい検索を行う[`Suggester`]を提供します。
//!
//! # 主要な構造体
//!
//! - [`Suggester`]: 辞書と検索設定を保持し、候補を検索する
//! - [`Worker`]: 接頭辞キャッシュを持つセッション用のワーカー
//!
//! # 例
//!
//! ```
//! use ranktrie::{Dictionary, Suggester, TrieBuilder};
//!
//! let image = TrieBuilder::from_words(["the", "there", "their", "where"]).build()?;
//! let dict = Dictionary::from_bytes(&image.to_bytes())?;
//! let suggester = Suggester::new(dict);
//!
//! assert_eq!(suggester.prefix_suggest("the", 3), ["the", "there", "their"]);
//! assert!(suggester.is_word("where"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub(crate) mod fuzzy;
pub(crate) mod prefix;
pub mod worker;

use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::dictionary::Dictionary;
use crate::errors::Result;
use crate::suggester::worker::Worker;

pub use crate::suggester::fuzzy::FuzzyMatch;
pub use crate::suggester::prefix::PrefixMatch;

/// 補完候補を検索する構造体。
///
/// 辞書は`Arc`で保持されるため、クローンは安価で、
/// 複数のスレッドから同じ辞書を検索できます。
///
/// このレベルのメソッドは入力を正規化しません。小文字のASCII英字以外を含む
/// 入力には一致する単語がありません。正規化は[`Engine`](crate::Engine)が行います。
#[derive(Clone)]
pub struct Suggester {
    dict: Arc<Dictionary>,
    config: SearchConfig,
}

impl Suggester {
    /// 新しいインスタンスを作成します。
    ///
    /// 辞書の所有権は移動します。複数のインスタンスで辞書を共有する場合は
    /// [`Suggester::from_shared_dictionary`]を使用してください。
    pub fn new(dict: Dictionary) -> Self {
        Self::from_shared_dictionary(Arc::new(dict))
    }

    /// 共有された辞書から新しいインスタンスを作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ranktrie::{Dictionary, Suggester, TrieBuilder};
    ///
    /// let image = TrieBuilder::from_words(["apple", "apply"]).build()?;
    /// let dict = Arc::new(Dictionary::from_bytes(&image.to_bytes())?);
    /// let s1 = Suggester::from_shared_dictionary(dict.clone());
    /// let s2 = Suggester::from_shared_dictionary(dict);
    /// assert_eq!(s1.prefix_suggest("app", 2), s2.prefix_suggest("app", 2));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            config: SearchConfig::default(),
        }
    }

    /// 検索設定を置き換えます。
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// あいまい検索の最大編集距離を設定します。
    pub fn max_distance(mut self, max_distance: u32) -> Self {
        self.config.max_distance = max_distance;
        self
    }

    /// 接頭辞検索で展開するノード数の上限を設定します。
    pub fn max_visited_nodes(mut self, max_visited_nodes: usize) -> Self {
        self.config.max_visited_nodes = max_visited_nodes;
        self
    }

    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    #[inline(always)]
    pub fn shared_dictionary(&self) -> Arc<Dictionary> {
        Arc::clone(&self.dict)
    }

    #[inline(always)]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 単語が辞書に含まれるかどうかを返します。
    pub fn is_word(&self, word: &str) -> bool {
        self.dict.is_word(word)
    }

    /// 接頭辞で始まる単語を順位の昇順に最大`limit`件返します。
    ///
    /// 接頭辞自体が単語であれば、その単語も結果に含まれます。
    pub fn prefix_search(&self, prefix: &str, limit: usize) -> Vec<PrefixMatch> {
        // A token that never fires cannot produce Cancelled.
        self.prefix_search_with_cancel(prefix, limit, &CancelToken::never())
            .unwrap_or_default()
    }

    /// キャンセル可能な[`prefix_search()`](Self::prefix_search)。
    ///
    /// # エラー
    ///
    /// トークンがキャンセルされた場合に[`RankTrieError::Cancelled`](crate::errors::RankTrieError::Cancelled)を返します。
    pub fn prefix_search_with_cancel(
        &self,
        prefix: &str,
        limit: usize,
        token: &CancelToken,
    ) -> Result<Vec<PrefixMatch>> {
        match self.dict.resolve(prefix) {
            Some(id) => self.prefix_search_from(id, prefix, limit, token),
            None => Ok(vec![]),
        }
    }

    /// 解決済みのノードから接頭辞検索を行います。
    pub(crate) fn prefix_search_from(
        &self,
        id: u32,
        prefix: &str,
        limit: usize,
        token: &CancelToken,
    ) -> Result<Vec<PrefixMatch>> {
        prefix::search(
            &self.dict,
            id,
            prefix,
            limit,
            self.config.max_visited_nodes,
            token,
        )
    }

    /// 接頭辞で始まる単語を順位の昇順に最大`limit`件返します。
    pub fn prefix_suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.prefix_search(prefix, limit)
            .into_iter()
            .map(|m| m.word)
            .collect()
    }

    /// 入力から編集距離`max_distance`以内の単語を最大`limit`件返します。
    ///
    /// 結果は距離の昇順、同じ距離では順位の昇順に並びます。
    /// 入力自体が辞書に含まれていれば、距離0で結果に含まれます。
    pub fn fuzzy_search(&self, word: &str, limit: usize, max_distance: u32) -> Vec<FuzzyMatch> {
        self.fuzzy_search_with_cancel(word, limit, max_distance, &[], &CancelToken::never())
            .unwrap_or_default()
    }

    /// キャンセル可能で、除外する単語を指定できる[`fuzzy_search()`](Self::fuzzy_search)。
    ///
    /// `exclude`に含まれる単語は結果に含めず、件数にも数えません。
    ///
    /// # エラー
    ///
    /// トークンがキャンセルされた場合に[`RankTrieError::Cancelled`](crate::errors::RankTrieError::Cancelled)を返します。
    pub fn fuzzy_search_with_cancel(
        &self,
        word: &str,
        limit: usize,
        max_distance: u32,
        exclude: &[String],
        token: &CancelToken,
    ) -> Result<Vec<FuzzyMatch>> {
        fuzzy::search(
            &self.dict,
            word.as_bytes(),
            limit,
            max_distance,
            exclude,
            token,
        )
    }

    /// 入力から編集距離`max_distance`以内の単語を最大`limit`件返します。
    pub fn fuzzy_suggest(&self, word: &str, limit: usize, max_distance: u32) -> Vec<String> {
        self.fuzzy_search(word, limit, max_distance)
            .into_iter()
            .map(|m| m.word)
            .collect()
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }
}
