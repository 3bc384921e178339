//! 辞書の読み込み機能に関するテスト
//!
//! 各読み込み方法(バイト列、リーダー、ファイル、zstd圧縮ファイル)と、
//! 破損したデータの検出を検証します。

use tempfile::tempdir;

use crate::errors::RankTrieError;
use crate::tests::words_bytes;
use crate::{Dictionary, Suggester, TrieBuilder};

fn header(structure: u32, pointers: u32, ranks: u32) -> Vec<u8> {
    let mut bytes = vec![];
    for len in [structure, pointers, ranks] {
        bytes.extend_from_slice(&len.to_le_bytes());
    }
    bytes
}

/// 単語"a"だけを持つトライを、単語順位の拡張なしで手書きします。
fn single_word_bytes() -> Vec<u8> {
    let mut bytes = header(8, 8, 2);
    let root: u32 = 1 | (1 << 20);
    let a: u32 = (1 << 26) | (1 << 27);
    for v in [root, a, 0, 1] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

fn section(err: RankTrieError) -> &'static str {
    match err {
        RankTrieError::InvalidFormat(e) => e.section(),
        e => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_handwritten_file() {
    let dict = Dictionary::from_bytes(&single_word_bytes()).unwrap();
    assert_eq!(dict.num_nodes(), 2);
    assert!(dict.is_word("a"));
    assert!(!dict.is_word("b"));
    assert_eq!(dict.words(), [("a".to_string(), 0)]);
}

#[test]
fn test_file_without_word_ranks() {
    // "there" then "the", with only the best ranks stored.
    let image = TrieBuilder::from_words(["there", "the"]).build().unwrap();
    let bytes = image.to_bytes();
    let dict = Dictionary::from_bytes(&bytes).unwrap();
    assert_eq!(dict.words(), [("there".to_string(), 0), ("the".to_string(), 1)]);

    // Drop the extra word rank of "the" and rewrite the lengths and pointers.
    let num_nodes = image.num_nodes();
    let ranks_start = 12 + num_nodes * 8;
    let mut ranks = bytes[ranks_start..].to_vec();
    // t h e r e: the word rank of "the" is the 5th rank entry.
    assert_eq!(ranks, [0, 0, 0, 0, 1, 0, 0]);
    ranks.remove(4);
    let mut legacy = header(
        image.structure_len() as u32,
        image.pointer_len() as u32,
        ranks.len() as u32,
    );
    legacy.extend_from_slice(&bytes[12..12 + num_nodes * 4]);
    for i in 0..num_nodes as u32 {
        legacy.extend_from_slice(&i.to_le_bytes());
    }
    legacy.extend_from_slice(&ranks);

    let dict = Dictionary::from_bytes(&legacy).unwrap();
    assert!(dict.is_word("the"));
    assert!(dict.is_word("there"));
    assert_eq!(dict.word_rank(dict.resolve("the").unwrap()), 0);
    let suggester = Suggester::new(dict);
    assert_eq!(suggester.prefix_suggest("th", 5).len(), 2);
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let mut bytes = single_word_bytes();
    bytes.extend_from_slice(&[0xff; 7]);
    assert!(Dictionary::from_bytes(&bytes).unwrap().is_word("a"));
}

#[test]
fn test_short_header() {
    let err = Dictionary::from_bytes(&[0; 11]).err().unwrap();
    assert_eq!(section(err), "header");
}

#[test]
fn test_lengths_exceed_data() {
    let mut bytes = single_word_bytes();
    bytes.pop();
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "header");

    let mut bytes = header(u32::MAX, u32::MAX, u32::MAX);
    bytes.extend_from_slice(&[0; 16]);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "header");
}

#[test]
fn test_unaligned_lengths() {
    let mut bytes = header(7, 8, 3);
    bytes.extend_from_slice(&[0; 18]);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");

    let mut bytes = header(8, 6, 4);
    bytes.extend_from_slice(&[0; 18]);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "pointers");
}

#[test]
fn test_no_root() {
    let bytes = header(0, 0, 0);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");
}

#[test]
fn test_pointer_count_mismatch() {
    let mut bytes = header(8, 4, 2);
    let root: u32 = 1 | (1 << 20);
    let a: u32 = (1 << 26) | (1 << 27);
    for v in [root, a, 0] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(&[0, 0]);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "pointers");
}

#[test]
fn test_invalid_child_range() {
    let mut bytes = single_word_bytes();
    // root claims two children
    bytes[12..16].copy_from_slice(&(1u32 | (2 << 20)).to_le_bytes());
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");

    let mut bytes = single_word_bytes();
    // root points to itself
    bytes[12..16].copy_from_slice(&(1u32 << 20).to_le_bytes());
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");
}

/// 手書きのノード配列から、各ノードの順位が0のトライを組み立てます。
fn nodes_bytes(nodes: &[u32]) -> Vec<u8> {
    let n = nodes.len() as u32;
    let mut bytes = header(n * 4, n * 4, n);
    for &v in nodes {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    for i in 0..n {
        bytes.extend_from_slice(&i.to_le_bytes());
    }
    bytes.extend(std::iter::repeat_n(0u8, nodes.len()));
    bytes
}

#[test]
fn test_shared_children() {
    let end = 1u32 << 26;
    // root -> a, b; a -> b, c overlaps the children of root
    let bytes = nodes_bytes(&[
        1 | (2 << 20),
        2 | (2 << 20) | (1 << 27),
        end | (2 << 27),
        end | (3 << 27),
    ]);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");

    // the same shape laid out as a tree loads
    let bytes = nodes_bytes(&[
        1 | (2 << 20),
        3 | (2 << 20) | (1 << 27),
        end | (2 << 27),
        end | (2 << 27),
        end | (3 << 27),
    ]);
    let dict = Dictionary::from_bytes(&bytes).unwrap();
    assert!(dict.is_word("ab"));
    assert!(dict.is_word("ac"));
    assert_eq!(dict.words().len(), 3);
}

#[test]
fn test_orphan_node() {
    let end = 1u32 << 26;
    let bytes = nodes_bytes(&[1 | (1 << 20), end | (1 << 27), end | (2 << 27)]);
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");
}

#[test]
fn test_invalid_char_code() {
    let mut bytes = single_word_bytes();
    bytes[16..20].copy_from_slice(&((1u32 << 26) | (27 << 27)).to_le_bytes());
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "structure");
}

#[test]
fn test_invalid_rank_pointer() {
    let mut bytes = single_word_bytes();
    // second pointer past the rank stream
    bytes[24..28].copy_from_slice(&5u32.to_le_bytes());
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "ranks");

    let mut bytes = single_word_bytes();
    // unterminated varint
    let n = bytes.len();
    bytes[n - 1] = 0x80;
    assert_eq!(section(Dictionary::from_bytes(&bytes).err().unwrap()), "ranks");
}

#[test]
fn test_oversized_rank_saturates() {
    let mut bytes = header(8, 8, 4);
    let root: u32 = 1 | (1 << 20);
    let a: u32 = (1 << 26) | (1 << 27);
    for v in [root, a, 0, 1] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    // 0, then 2^16 + 1 as a three-byte varint
    bytes.extend_from_slice(&[0x00, 0x81, 0x80, 0x04]);
    let dict = Dictionary::from_bytes(&bytes).unwrap();
    assert_eq!(dict.best_rank(1), 0xffff);
}

#[test]
fn test_read_and_path() {
    let bytes = words_bytes();
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.bin");
    std::fs::write(&path, &bytes).unwrap();

    let from_bytes = Dictionary::from_bytes(&bytes).unwrap();
    let from_reader = Dictionary::read(bytes.as_slice()).unwrap();
    let from_path = Dictionary::from_path(&path).unwrap();
    assert_eq!(from_bytes.words(), from_reader.words());
    assert_eq!(from_bytes.words(), from_path.words());
}

#[test]
fn test_zstd_round_trip() {
    let image = TrieBuilder::from_words(["hello", "help", "world"]).build().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.bin.zst");
    image.write_zstd_to_path(&path, 19).unwrap();
    let dict = Dictionary::from_zstd(&path).unwrap();
    assert_eq!(
        Suggester::new(dict).prefix_suggest("hel", 5),
        ["hello", "help"]
    );
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = Dictionary::from_path(dir.path().join("missing.bin")).err().unwrap();
    assert!(matches!(err, RankTrieError::InvalidArgument(_)));
}
