//! 編集距離によるあいまい検索
//!
//! 入力の未消費部分とトライの経路を同時にたどり、削除・一致/置換・挿入の
//! 3種類の遷移で編集距離を数えます。再帰の代わりに明示的なスタックを使い、
//! 同じ状態 (ノード, 残り文字数, 距離) を二度展開しないようにメモします。
use hashbrown::{HashMap, HashSet};

use crate::cancel::CancelToken;
use crate::dictionary::{Dictionary, ROOT};
use crate::errors::Result;
use crate::utils::code_to_char;

/// あいまい検索の結果
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FuzzyMatch {
    /// 見つかった単語
    pub word: String,
    /// 入力との編集距離
    pub distance: u32,
    /// 単語の頻度順位
    pub rank: u32,
}

struct Frame {
    id: u32,
    pos: usize,
    distance: u32,
    word: String,
}

/// 入力から編集距離`max_distance`以内の単語を最大`limit`件返します。
///
/// 結果は距離の昇順、同じ距離では順位の昇順に並びます。
/// `exclude`に含まれる単語は結果に含めず、件数にも数えません。
pub(crate) fn search(
    dict: &Dictionary,
    input: &[u8],
    limit: usize,
    max_distance: u32,
    exclude: &[String],
    token: &CancelToken,
) -> Result<Vec<FuzzyMatch>> {
    if limit == 0 {
        return Ok(vec![]);
    }

    let mut found: HashMap<String, (u32, u32)> = HashMap::new();
    let mut worst = max_distance;
    let mut memo: HashSet<(u32, usize, u32)> = HashSet::new();
    let mut stack = vec![Frame {
        id: ROOT,
        pos: 0,
        distance: 0,
        word: String::new(),
    }];

    while let Some(frame) = stack.pop() {
        token.check()?;

        if frame.distance > max_distance {
            continue;
        }
        if found.len() >= limit && frame.distance > worst {
            continue;
        }
        let remaining = input.len() - frame.pos;
        if !memo.insert((frame.id, remaining, frame.distance)) {
            continue;
        }

        let node = dict.node(frame.id);
        if remaining == 0 && node.is_end_of_word() && !exclude.contains(&frame.word) {
            let rank = dict.word_rank(frame.id);
            let entry = found.entry(frame.word.clone()).or_insert((frame.distance, rank));
            if frame.distance < entry.0 {
                entry.0 = frame.distance;
            }
            if found.len() >= limit {
                worst = found.values().map(|&(d, _)| d).max().unwrap_or(max_distance);
            }
        }

        // Pushed in reverse so that deletion pops first, then each child in
        // order with match/substitution ahead of insertion.
        let next_distance = frame.distance + 1;
        for child in node.children().rev() {
            let c = code_to_char(dict.node(child).char_code());
            let mut word = String::with_capacity(frame.word.len() + 1);
            word.push_str(&frame.word);
            word.push(char::from(c));

            if next_distance <= max_distance {
                stack.push(Frame {
                    id: child,
                    pos: frame.pos,
                    distance: next_distance,
                    word: word.clone(),
                });
            }
            if remaining > 0 {
                let cost = u32::from(input[frame.pos] != c);
                if frame.distance + cost <= max_distance {
                    stack.push(Frame {
                        id: child,
                        pos: frame.pos + 1,
                        distance: frame.distance + cost,
                        word,
                    });
                }
            }
        }
        if remaining > 0 && next_distance <= max_distance {
            stack.push(Frame {
                id: frame.id,
                pos: frame.pos + 1,
                distance: next_distance,
                word: frame.word,
            });
        }
    }

    let mut matches: Vec<FuzzyMatch> = found
        .into_iter()
        .map(|(word, (distance, rank))| FuzzyMatch {
            word,
            distance,
            rank,
        })
        .collect();
    matches.sort_unstable_by(|a, b| {
        (a.distance, a.rank, &a.word).cmp(&(b.distance, b.rank, &b.word))
    });
    matches.truncate(limit);
    Ok(matches)
}
