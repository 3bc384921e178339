//! トライ構築のためのビルダー
//!
//! このモジュールは、頻度順に並んだ単語リストからメモリ上のトライを構築し、
//! [`TrieImage`]へ変換するためのビルダーを提供します。

use std::io::BufRead;

use crate::dictionary::serializer::{self, TrieImage};
use crate::errors::{BuildError, Result};
use crate::num;
use crate::utils::{char_to_code, normalize_word, ALPHABET_SIZE};

/// 構築時のトライノード
///
/// アルファベットが閉じているため、子は文字コードで添字付けされた固定長配列で保持します。
#[derive(Default, Debug)]
pub struct TrieNode {
    pub(crate) children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
    pub(crate) word_rank: Option<u32>,
    pub(crate) best_rank: Option<u32>,
}

impl TrieNode {
    /// このノードで終わる単語があるかどうか
    #[inline(always)]
    pub const fn is_end_of_word(&self) -> bool {
        self.word_rank.is_some()
    }

    /// このノードを通る単語の最小順位
    #[inline(always)]
    pub const fn best_rank(&self) -> Option<u32> {
        self.best_rank
    }

    /// このノードで終わる単語の順位
    #[inline(always)]
    pub const fn word_rank(&self) -> Option<u32> {
        self.word_rank
    }

    /// 文字コードと子ノードの組を文字コード順に列挙します。
    pub fn children(&self) -> impl Iterator<Item = (u8, &TrieNode)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_deref().map(|c| (i as u8 + 1, c)))
    }

    #[inline(always)]
    fn update_best(&mut self, rank: u32) {
        self.best_rank = Some(self.best_rank.map_or(rank, |r| r.min(rank)));
    }
}

/// 単語リストから[`TrieImage`]を構築するビルダー
///
/// # 例
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ranktrie::{Dictionary, TrieBuilder};
///
/// let image = TrieBuilder::from_words(["the", "there", "their", "where"]).build()?;
/// let dict = Dictionary::from_bytes(&image.to_bytes())?;
/// assert!(dict.is_word("their"));
/// assert!(!dict.is_word("thei"));
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct TrieBuilder {
    root: TrieNode,
    num_words: usize,
    max_rank: Option<u32>,
}

impl TrieBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// 単語のイテレータからビルダーを作成します。
    ///
    /// 各単語の順位はイテレータ内の位置になります。
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut b = Self::new();
        for (rank, word) in words.into_iter().enumerate() {
            b.add_word(word.as_ref(), u32::try_from(rank).unwrap_or(u32::MAX));
        }
        b
    }

    /// 1行1単語の単語リストからビルダーを作成します。
    ///
    /// 各行は前後の空白を除去され、空行とASCII英字以外を含む行は
    /// 順位を割り当てる前に読み飛ばされます。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合にエラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut words = vec![];
        let mut skipped = 0usize;
        for line in rdr.lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            if !word.bytes().all(|b| b.is_ascii_alphabetic()) {
                skipped += 1;
                continue;
            }
            words.push(word.to_ascii_lowercase());
        }
        if skipped != 0 {
            log::warn!("[ranktrie] skipped {skipped} lines containing non-letter characters");
        }
        Ok(Self::from_words(words))
    }

    /// 単語を1つ追加します。
    ///
    /// 単語は正規化(ASCII小文字化、英字以外の除去)されてから挿入されます。
    /// 正規化後に空になる単語は無視されます。同じ単語が複数回追加された場合は
    /// 小さい方の順位が残ります。
    pub fn add_word(&mut self, word: &str, rank: u32) {
        let word = normalize_word(word);
        if word.is_empty() {
            return;
        }
        self.max_rank = Some(self.max_rank.map_or(rank, |r| r.max(rank)));

        let mut node = &mut self.root;
        node.update_best(rank);
        for c in word.bytes() {
            // normalize_word() leaves only lowercase letters.
            let Some(code) = char_to_code(c) else { continue };
            node = node.children[usize::from(code - 1)].get_or_insert_with(Box::default).as_mut();
            node.update_best(rank);
        }
        if node.word_rank.is_none() {
            self.num_words += 1;
        }
        node.word_rank = Some(node.word_rank.map_or(rank, |r| r.min(rank)));
    }

    /// 追加された異なる単語の数
    #[inline(always)]
    pub const fn num_words(&self) -> usize {
        self.num_words
    }

    /// ルートノードへの参照を取得します。
    #[inline(always)]
    pub const fn root(&self) -> &TrieNode {
        &self.root
    }

    /// トライを検証し、バイナリイメージへ変換します。
    ///
    /// # エラー
    ///
    /// 以下の場合に[`BuildError`]を返します:
    /// - 有効な単語が1つもない場合
    /// - 順位が番兵値[`num::UNRANKED`]以上になる場合
    /// - ノード数・子ノード数がフォーマットの容量を超える場合
    pub fn build(self) -> Result<TrieImage, BuildError> {
        if self.num_words == 0 {
            return Err(BuildError::EmptyVocabulary);
        }
        if let Some(rank) = self.max_rank
            && !num::is_valid_rank(rank)
        {
            return Err(BuildError::RankOverflow {
                rank,
                sentinel: num::UNRANKED,
            });
        }
        let image = serializer::serialize(&self.root)?;
        log::debug!(
            "[ranktrie] built trie: {} words, {} nodes, {} bytes",
            self.num_words,
            image.num_nodes(),
            image.byte_len(),
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child<'a>(node: &'a TrieNode, c: u8) -> &'a TrieNode {
        node.children[usize::from(c - b'a')].as_deref().unwrap()
    }

    #[test]
    fn test_best_rank_propagation() {
        let b = TrieBuilder::from_words(["the", "there", "their", "where"]);
        let root = b.root();
        assert_eq!(root.best_rank(), Some(0));
        let t = child(root, b't');
        let w = child(root, b'w');
        assert_eq!(t.best_rank(), Some(0));
        assert_eq!(w.best_rank(), Some(3));
        let the = child(child(t, b'h'), b'e');
        assert!(the.is_end_of_word());
        assert_eq!(the.word_rank(), Some(0));
        assert_eq!(child(the, b'r').best_rank(), Some(1));
        assert_eq!(child(the, b'i').best_rank(), Some(2));
    }

    #[test]
    fn test_word_rank_differs_from_best_rank() {
        let b = TrieBuilder::from_words(["there", "the"]);
        let the = child(child(child(b.root(), b't'), b'h'), b'e');
        assert_eq!(the.best_rank(), Some(0));
        assert_eq!(the.word_rank(), Some(1));
    }

    #[test]
    fn test_duplicates_keep_lower_rank() {
        let b = TrieBuilder::from_words(["cat", "dog", "cat"]);
        assert_eq!(b.num_words(), 2);
        let cat = child(child(child(b.root(), b'c'), b'a'), b't');
        assert_eq!(cat.word_rank(), Some(0));
    }

    #[test]
    fn test_words_are_normalized() {
        let b = TrieBuilder::from_words(["Don't", "42", ""]);
        assert_eq!(b.num_words(), 1);
        let dont = child(child(child(child(b.root(), b'd'), b'o'), b'n'), b't');
        assert_eq!(dont.word_rank(), Some(0));
    }

    #[test]
    fn test_from_reader_skips_invalid_lines() {
        let text = "hello\n\n  World \nfoo-bar\nx1\nagain\r\n";
        let b = TrieBuilder::from_reader(text.as_bytes()).unwrap();
        assert_eq!(b.num_words(), 3);
        let world = ["w", "o", "r", "l", "d"]
            .iter()
            .fold(b.root(), |n, c| child(n, c.as_bytes()[0]));
        assert_eq!(world.word_rank(), Some(1));
    }

    #[test]
    fn test_build_empty_vocabulary() {
        assert!(matches!(
            TrieBuilder::new().build(),
            Err(BuildError::EmptyVocabulary)
        ));
        assert!(matches!(
            TrieBuilder::from_words(["", "123"]).build(),
            Err(BuildError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_build_rank_overflow() {
        let mut b = TrieBuilder::new();
        b.add_word("a", num::UNRANKED);
        assert!(matches!(
            b.build(),
            Err(BuildError::RankOverflow { rank: 65535, .. })
        ));
    }
}
