//! 接頭辞補完のための最良優先探索。
//!
//! 各ノードの最小順位は、そのノード以下で到達できる単語の順位の下界です。
//! 最小順位が最も小さいノードから展開することで、部分木全体を調べずに
//! 頻度順で単語を発見できます。
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cancel::CancelToken;
use crate::dictionary::Dictionary;
use crate::errors::Result;
use crate::utils::code_to_char;

/// 接頭辞検索の結果
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PrefixMatch {
    /// 補完された単語
    pub word: String,
    /// 単語の頻度順位
    pub rank: u32,
}

/// 優先度付きキュー内のアイテム。
#[derive(Debug)]
struct QueueItem {
    /// ノードなら最小順位、単語候補なら単語の順位。
    priority: u32,
    id: u32,
    word: String,
    /// 展開済みで、単語として受理を待っているだけのアイテム。
    is_candidate: bool,
}

impl PartialEq for QueueItem { fn eq(&self, other: &Self) -> bool { self.priority == other.priority } }
impl Eq for QueueItem {}
impl PartialOrd for QueueItem { fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) } }
impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering { other.priority.cmp(&self.priority) } // Invert to create a min-heap
}

/// 順位順に並んだ上位`limit`件の結果。
struct TopMatches {
    matches: Vec<PrefixMatch>,
    limit: usize,
}

impl TopMatches {
    fn new(limit: usize) -> Self {
        Self {
            matches: Vec::with_capacity(limit + 1),
            limit,
        }
    }

    #[inline(always)]
    fn is_full(&self) -> bool {
        self.matches.len() >= self.limit
    }

    /// 結果が埋まっていて、`priority`が最悪の受理済み順位より大きいか。
    #[inline(always)]
    fn rejects(&self, priority: u32) -> bool {
        self.is_full() && self.matches.last().is_some_and(|m| priority > m.rank)
    }

    fn insert(&mut self, word: String, rank: u32) {
        let pos = self.matches.partition_point(|m| m.rank <= rank);
        self.matches.insert(pos, PrefixMatch { word, rank });
        self.matches.truncate(self.limit);
    }
}

/// `start`ノード以下の単語を順位の昇順に最大`limit`件返します。
///
/// `prefix`は`start`ノードに到達する文字列で、結果の単語の先頭になります。
/// 展開したノード数が`max_visited`に達した場合は、その時点までの結果を返します。
pub(crate) fn search(
    dict: &Dictionary,
    start: u32,
    prefix: &str,
    limit: usize,
    max_visited: usize,
    token: &CancelToken,
) -> Result<Vec<PrefixMatch>> {
    if limit == 0 {
        return Ok(vec![]);
    }
    let mut top = TopMatches::new(limit);
    let mut queue = BinaryHeap::new();
    queue.push(QueueItem {
        priority: dict.best_rank(start),
        id: start,
        word: prefix.to_string(),
        is_candidate: false,
    });

    let mut visited = 0;
    while let Some(item) = queue.pop() {
        token.check()?;

        // best_rank is a lower bound of every rank below the node.
        if top.rejects(item.priority) {
            break;
        }
        if item.is_candidate {
            top.insert(item.word, item.priority);
            continue;
        }
        if visited >= max_visited {
            log::trace!(
                "[ranktrie] prefix search for {prefix:?} stopped after visiting {visited} nodes"
            );
            break;
        }
        visited += 1;

        let node = dict.node(item.id);
        for child in node.children() {
            let priority = dict.best_rank(child);
            if top.rejects(priority) {
                continue;
            }
            let mut word = String::with_capacity(item.word.len() + 1);
            word.push_str(&item.word);
            word.push(char::from(code_to_char(dict.node(child).char_code())));
            queue.push(QueueItem {
                priority,
                id: child,
                word,
                is_candidate: false,
            });
        }

        if node.is_end_of_word() {
            let rank = dict.word_rank(item.id);
            if rank <= item.priority {
                top.insert(item.word, rank);
            } else if !top.rejects(rank) {
                // A more frequent word extends this one; accept it when its own rank comes up.
                queue.push(QueueItem {
                    priority: rank,
                    id: item.id,
                    word: item.word,
                    is_candidate: true,
                });
            }
        }
    }

    Ok(top.matches)
}
