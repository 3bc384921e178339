//! 入力セッション単位の補完エンジン
//!
//! [`Engine`]は、辞書の読み込み状態、接頭辞キャッシュ、キャンセルの世代を保持します。
//! クエリごとに、完全一致の接頭辞候補を同期的に返し、不足分をあいまい検索で
//! バックグラウンドスレッドから補います。新しいクエリが発行されると、
//! 以前のあいまい検索はキャンセルされます。
use std::thread::{self, JoinHandle};

use crate::cancel::{CancelSource, CancelToken};
use crate::config::SearchConfig;
use crate::dictionary::Dictionary;
use crate::errors::{RankTrieError, Result};
use crate::suggester::worker::Worker;
use crate::suggester::Suggester;
use crate::utils::normalize_word;

/// 補完エンジン
///
/// # 例
///
/// ```
/// use ranktrie::{Engine, SearchConfig, TrieBuilder};
///
/// let bytes = TrieBuilder::from_words(["the", "there", "their", "where"]).build()?.to_bytes();
/// let mut engine = Engine::new(SearchConfig::default());
/// engine.load(&bytes)?;
///
/// let suggestions = engine.suggest("Tere", 3);
/// assert!(suggestions.exact.is_empty());
/// assert_eq!(suggestions.approximate.wait()?, ["there", "the", "where"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Engine {
    config: SearchConfig,
    worker: Option<Worker>,
    cancel: CancelSource,
}

impl Engine {
    /// 辞書が読み込まれていないエンジンを作成します。
    ///
    /// 読み込み前のクエリには常に空の結果が返ります。
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            worker: None,
            cancel: CancelSource::new(),
        }
    }

    /// 読み込み済みの検索器からエンジンを作成します。
    ///
    /// 検索器の設定がエンジンの設定になります。
    pub fn from_suggester(suggester: Suggester) -> Self {
        Self {
            config: *suggester.config(),
            worker: Some(suggester.new_worker()),
            cancel: CancelSource::new(),
        }
    }

    /// バイト列から辞書を読み込みます。
    ///
    /// すでに読み込み済みの場合は何もせず、既存の検索器を返します。
    ///
    /// # エラー
    ///
    /// データが不正な場合に[`RankTrieError::InvalidFormat`]を返します。
    /// この場合、エンジンは未読み込みのままです。
    pub fn load(&mut self, bytes: &[u8]) -> Result<&Suggester> {
        let worker = match self.worker.take() {
            Some(worker) => {
                log::debug!("[ranktrie] dictionary already loaded; ignoring load request");
                worker
            }
            None => Suggester::new(Dictionary::from_bytes(bytes)?)
                .with_config(self.config)
                .new_worker(),
        };
        Ok(self.worker.insert(worker).suggester())
    }

    #[inline(always)]
    pub fn is_loaded(&self) -> bool {
        self.worker.is_some()
    }

    #[inline(always)]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 読み込み済みであれば検索器を返します。
    pub fn suggester(&self) -> Option<&Suggester> {
        self.worker.as_ref().map(Worker::suggester)
    }

    /// 実行中のあいまい検索をすべてキャンセルします。
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// クエリに対する補完候補を返します。
    ///
    /// クエリは正規化(小文字化と英字以外の除去)されます。正規化後のクエリが
    /// 最小クエリ長より短い場合、または辞書が読み込まれていない場合は空の結果になります。
    ///
    /// 完全一致の候補が`limit`件に満たない場合、残りの件数をあいまい検索で探します。
    /// あいまい検索は完全一致の候補を除外し、バックグラウンドスレッドで実行されます。
    /// このメソッドを呼ぶと、以前のクエリのあいまい検索はキャンセルされます。
    pub fn suggest(&mut self, query: &str, limit: usize) -> Suggestions {
        let token = self.cancel.renew();
        let query = normalize_word(query);
        let Some(worker) = self.worker.as_mut() else {
            return Suggestions::empty(token);
        };
        if limit == 0 || query.len() < self.config.min_query_len.max(1) {
            return Suggestions::empty(token);
        }

        let exact: Vec<String> = match worker.prefix_search(&query, limit, &token) {
            Ok(matches) => matches.into_iter().map(|m| m.word).collect(),
            Err(e) => {
                log::debug!("[ranktrie] prefix search for {query:?} ended early: {e}");
                vec![]
            }
        };
        if exact.len() >= limit {
            return Suggestions {
                exact,
                approximate: PendingSuggestions::ready(vec![], token),
            };
        }

        let remaining = limit - exact.len();
        let suggester = worker.suggester().clone();
        let max_distance = self.config.max_distance;
        let exclude = exact.clone();
        let thread_token = token.clone();
        let spawned = thread::Builder::new()
            .name("ranktrie-fuzzy".to_string())
            .spawn(move || -> Result<Vec<String>> {
                let matches = suggester.fuzzy_search_with_cancel(
                    &query,
                    remaining,
                    max_distance,
                    &exclude,
                    &thread_token,
                )?;
                Ok(matches.into_iter().map(|m| m.word).collect())
            });
        let approximate = match spawned {
            Ok(handle) => PendingSuggestions {
                state: Pending::Running(handle),
                token,
            },
            Err(e) => {
                log::warn!("[ranktrie] failed to spawn a fuzzy search thread: {e}");
                PendingSuggestions::ready(vec![], token)
            }
        };
        Suggestions { exact, approximate }
    }

    /// 設定の既定件数(`SearchConfig::default_limit`)で補完候補を返します。
    pub fn suggest_default(&mut self, query: &str) -> Suggestions {
        let limit = self.config.default_limit;
        self.suggest(query, limit)
    }

    /// 単語が辞書に含まれるかどうかを返します。
    ///
    /// 単語は[`suggest()`](Self::suggest)と同じく正規化されます。
    /// 辞書が読み込まれていない場合は`false`です。
    pub fn is_word(&mut self, word: &str) -> bool {
        let word = normalize_word(word);
        if word.is_empty() {
            return false;
        }
        self.worker
            .as_mut()
            .is_some_and(|worker| worker.is_word(&word))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// 1つのクエリに対する補完候補
#[derive(Debug)]
pub struct Suggestions {
    /// 接頭辞に一致する候補(順位の昇順)
    pub exact: Vec<String>,
    /// あいまい検索による追加の候補
    pub approximate: PendingSuggestions,
}

impl Suggestions {
    fn empty(token: CancelToken) -> Self {
        Self {
            exact: vec![],
            approximate: PendingSuggestions::ready(vec![], token),
        }
    }
}

#[derive(Debug)]
enum Pending {
    Ready(Vec<String>),
    Running(JoinHandle<Result<Vec<String>>>),
}

/// 実行中または完了済みのあいまい検索の結果
#[derive(Debug)]
pub struct PendingSuggestions {
    state: Pending,
    token: CancelToken,
}

impl PendingSuggestions {
    fn ready(words: Vec<String>, token: CancelToken) -> Self {
        Self {
            state: Pending::Ready(words),
            token,
        }
    }

    /// 新しいクエリによって置き換えられたかどうか
    pub fn is_stale(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 検索が完了しているかどうか
    pub fn is_finished(&self) -> bool {
        match &self.state {
            Pending::Ready(_) => true,
            Pending::Running(handle) => handle.is_finished(),
        }
    }

    /// 検索の完了を待って結果を返します。
    ///
    /// # エラー
    ///
    /// - クエリが置き換えられた場合は[`RankTrieError::Cancelled`]を返します。
    ///   呼び出し側は結果を黙って破棄してください。
    /// - 検索スレッドがパニックした場合は[`RankTrieError::ThreadPanic`]を返します。
    pub fn wait(self) -> Result<Vec<String>> {
        let words = match self.state {
            Pending::Ready(words) => words,
            Pending::Running(handle) => handle.join().map_err(|e| {
                let panic_msg = if let Some(s) = e.downcast_ref::<&'static str>() {
                    s.to_string()
                } else if let Some(s) = e.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                RankTrieError::ThreadPanic(panic_msg)
            })??,
        };
        self.token.check()?;
        Ok(words)
    }
}
