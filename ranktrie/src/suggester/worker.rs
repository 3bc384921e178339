//! セッション単位の検索ルーチンを提供するモジュール。
//!
//! ワーカーは接頭辞からノードへの解決結果をキャッシュし、
//! 入力のたびに同じ接頭辞をたどり直すことを避けます。
use hashbrown::HashMap;

use crate::cancel::CancelToken;
use crate::dictionary::ROOT;
use crate::errors::Result;
use crate::suggester::{PrefixMatch, Suggester};
use crate::utils::char_to_code;

/// 接頭辞キャッシュを持つ検索用の構造体。
///
/// 1文字ずつ入力されるクエリでは、直前の接頭辞の解決結果がそのまま使えます。
/// 途中の接頭辞と、存在しない接頭辞(`None`)もキャッシュされます。
/// キャッシュは容量に達すると追加されなくなり、辞書が変わらない限り無効化は不要です。
///
/// # 例
///
/// ```
/// use ranktrie::{Dictionary, Suggester, TrieBuilder};
///
/// let image = TrieBuilder::from_words(["hello", "help", "world"]).build()?;
/// let suggester = Suggester::new(Dictionary::from_bytes(&image.to_bytes())?);
/// let mut worker = suggester.new_worker();
///
/// assert_eq!(worker.prefix_suggest("hel", 5), ["hello", "help"]);
/// assert_eq!(worker.prefix_suggest("help", 5), ["help"]);
/// assert!(worker.cache_len() >= 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Worker {
    pub(crate) suggester: Suggester,
    pub(crate) prefix_cache: HashMap<String, Option<u32>>,
}

impl Worker {
    pub(crate) fn new(suggester: Suggester) -> Self {
        Self {
            suggester,
            prefix_cache: HashMap::new(),
        }
    }

    #[inline(always)]
    pub fn suggester(&self) -> &Suggester {
        &self.suggester
    }

    /// キャッシュされている接頭辞の数
    #[inline(always)]
    pub fn cache_len(&self) -> usize {
        self.prefix_cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.prefix_cache.clear();
    }

    fn remember(&mut self, prefix: &str, id: Option<u32>) {
        if self.prefix_cache.len() < self.suggester.config().prefix_cache_capacity {
            self.prefix_cache.insert(prefix.to_string(), id);
        }
    }

    /// 接頭辞をたどって到達するノードを、キャッシュを使って解決します。
    pub fn prefix_node(&mut self, prefix: &str) -> Option<u32> {
        if let Some(&cached) = self.prefix_cache.get(prefix) {
            return cached;
        }
        if !prefix.bytes().all(|b| b.is_ascii_lowercase()) {
            self.remember(prefix, None);
            return None;
        }

        let mut id = ROOT;
        for end in 1..=prefix.len() {
            let sub = &prefix[..end];
            let next = match self.prefix_cache.get(sub) {
                Some(&cached) => cached,
                None => {
                    let next = char_to_code(prefix.as_bytes()[end - 1])
                        .and_then(|code| self.suggester.dictionary().find_child(id, code));
                    self.remember(sub, next);
                    next
                }
            };
            match next {
                Some(child) => id = child,
                None => {
                    self.remember(prefix, None);
                    return None;
                }
            }
        }
        Some(id)
    }

    /// キャッシュを使って接頭辞検索を行います。
    ///
    /// # エラー
    ///
    /// トークンがキャンセルされた場合に[`RankTrieError::Cancelled`](crate::errors::RankTrieError::Cancelled)を返します。
    pub fn prefix_search(
        &mut self,
        prefix: &str,
        limit: usize,
        token: &CancelToken,
    ) -> Result<Vec<PrefixMatch>> {
        match self.prefix_node(prefix) {
            Some(id) => self.suggester.prefix_search_from(id, prefix, limit, token),
            None => Ok(vec![]),
        }
    }

    /// キャッシュを使って接頭辞で始まる単語を最大`limit`件返します。
    pub fn prefix_suggest(&mut self, prefix: &str, limit: usize) -> Vec<String> {
        self.prefix_search(prefix, limit, &CancelToken::never())
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.word)
            .collect()
    }

    /// キャッシュを使って単語が辞書に含まれるかどうかを返します。
    pub fn is_word(&mut self, word: &str) -> bool {
        self.prefix_node(word)
            .is_some_and(|id| self.suggester.dictionary().node(id).is_end_of_word())
    }
}
