//! 総当たりの実装と比較するプロパティテスト
//!
//! 検証する性質:
//! - 構築したトライは入力の単語をすべて、その順位で保持する
//! - 接頭辞補完は接頭辞を持つ単語を順位順に返す
//! - あいまい検索は距離・順位順の上位を返す
//! - 任意のバイト列の読み込みはパニックしない

use proptest::prelude::*;

use crate::tests::{levenshtein, ranked_words};
use crate::{Dictionary, Suggester, TrieBuilder};

fn vocabulary() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,6}", 1..40)
}

fn suggester(words: &[String]) -> Suggester {
    let image = TrieBuilder::from_words(words).build().unwrap();
    Suggester::new(Dictionary::from_bytes(&image.to_bytes()).unwrap())
}

proptest! {
    #[test]
    fn prop_words_survive_serialization(words in vocabulary()) {
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut expected: Vec<(String, u32)> = ranked_words(&refs)
            .into_iter()
            .map(|(w, r)| (w.to_string(), r))
            .collect();
        expected.sort_by_key(|&(_, r)| r);
        let s = suggester(&words);
        prop_assert_eq!(s.dictionary().words(), expected);
        for w in &words {
            prop_assert!(s.is_word(w));
        }
    }

    #[test]
    fn prop_prefix_is_rank_ordered(words in vocabulary(), prefix in "[a-e]{0,3}", limit in 1usize..10) {
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut expected: Vec<(u32, &str)> = ranked_words(&refs)
            .into_iter()
            .filter(|(w, _)| w.starts_with(prefix.as_str()))
            .map(|(w, r)| (r, w))
            .collect();
        expected.sort();
        let expected: Vec<&str> = expected.into_iter().take(limit).map(|(_, w)| w).collect();
        prop_assert_eq!(suggester(&words).prefix_suggest(&prefix, limit), expected);
    }

    #[test]
    fn prop_fuzzy_is_distance_ordered(
        words in vocabulary(),
        input in "[a-f]{0,6}",
        limit in 1usize..8,
        max_distance in 0u32..3,
    ) {
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut expected: Vec<(u32, u32, &str)> = ranked_words(&refs)
            .into_iter()
            .map(|(w, r)| (levenshtein(&input, w), r, w))
            .filter(|&(d, _, _)| d <= max_distance)
            .collect();
        expected.sort();
        let expected: Vec<(String, u32)> = expected
            .into_iter()
            .take(limit)
            .map(|(d, _, w)| (w.to_string(), d))
            .collect();
        let got: Vec<(String, u32)> = suggester(&words)
            .fuzzy_search(&input, limit, max_distance)
            .into_iter()
            .map(|m| (m.word, m.distance))
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_arbitrary_bytes_do_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(dict) = Dictionary::from_bytes(&bytes) {
            let s = Suggester::new(dict);
            let _ = s.prefix_suggest("", 5);
            let _ = s.fuzzy_suggest("ab", 5, 2);
            let _ = s.is_word("a");
        }
    }
}
