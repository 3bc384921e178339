//! ranktrieのテストモジュール群
//!
//! 構築、読み込み、検索、セッションの各コンポーネントの動作を検証するテストと、
//! 総当たりの実装と比較するプロパティテストを含みます。

mod loading;
mod properties;

use crate::{Dictionary, Suggester, TrieBuilder};

/// 頻度順に並んだ英単語リスト
pub(crate) const WORDS: &str = include_str!("tests/resources/words.txt");

pub(crate) fn words_bytes() -> Vec<u8> {
    TrieBuilder::from_reader(WORDS.as_bytes())
        .unwrap()
        .build()
        .unwrap()
        .to_bytes()
}

pub(crate) fn words_suggester() -> Suggester {
    Suggester::new(Dictionary::from_bytes(&words_bytes()).unwrap())
}

/// 単語を順位付きで列挙します。重複は最初の順位が残ります。
pub(crate) fn ranked_words<'a>(words: &[&'a str]) -> Vec<(&'a str, u32)> {
    let mut ranked: Vec<(&str, u32)> = vec![];
    for (rank, &w) in words.iter().enumerate() {
        if !ranked.iter().any(|&(r, _)| r == w) {
            ranked.push((w, rank as u32));
        }
    }
    ranked
}

pub(crate) fn levenshtein(a: &str, b: &str) -> u32 {
    let b = b.as_bytes();
    let mut prev: Vec<u32> = (0..=b.len() as u32).collect();
    for (i, ca) in a.bytes().enumerate() {
        let mut cur = vec![i as u32 + 1];
        for (j, &cb) in b.iter().enumerate() {
            let sub = prev[j] + u32::from(ca != cb);
            cur.push(sub.min(prev[j + 1] + 1).min(cur[j] + 1));
        }
        prev = cur;
    }
    prev[b.len()]
}
