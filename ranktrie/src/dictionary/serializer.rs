//! トライの平坦化とバイナリ化
//!
//! 幅優先探索で各ノードに0始まりの位置を割り当て(ルートが0)、
//! 兄弟ノードを最小順位の昇順に並べてから、ノード配列・ポインタ配列・
//! 順位バイト列の3つのバッファに書き出します。

use std::collections::VecDeque;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::dictionary::builder::TrieNode;
use crate::dictionary::node::{PackedNode, MAX_NODES};
use crate::dictionary::varint;
use crate::errors::{BuildError, Result};
use crate::num;

/// ヘッダのバイト数(u32 × 3)
pub const HEADER_LEN: usize = 12;

/// シリアライズ済みのトライ
///
/// [`write()`](Self::write)の出力は[`Dictionary::from_bytes`](crate::Dictionary::from_bytes)
/// などの読み込みメソッドが期待する形式です。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrieImage {
    nodes: Vec<u32>,
    pointers: Vec<u32>,
    ranks: Vec<u8>,
}

impl TrieImage {
    /// ノード数
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// ノード配列のバイト数
    #[inline(always)]
    pub fn structure_len(&self) -> usize {
        self.nodes.len() * 4
    }

    /// ポインタ配列のバイト数
    #[inline(always)]
    pub fn pointer_len(&self) -> usize {
        self.pointers.len() * 4
    }

    /// 順位バイト列のバイト数
    #[inline(always)]
    pub fn rank_len(&self) -> usize {
        self.ranks.len()
    }

    /// ヘッダを含む全体のバイト数
    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        HEADER_LEN + self.structure_len() + self.pointer_len() + self.rank_len()
    }

    /// パック済みノード配列
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = PackedNode> + '_ {
        self.nodes.iter().map(|&n| PackedNode(n))
    }

    /// イメージをライターに書き出します。
    ///
    /// # エラー
    ///
    /// 書き込みに失敗した場合にエラーを返します。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        for len in [self.structure_len(), self.pointer_len(), self.rank_len()] {
            wtr.write_all(&u32::try_from(len)?.to_le_bytes())?;
        }
        for &n in &self.nodes {
            wtr.write_all(&n.to_le_bytes())?;
        }
        for &p in &self.pointers {
            wtr.write_all(&p.to_le_bytes())?;
        }
        wtr.write_all(&self.ranks)?;
        wtr.flush()?;
        Ok(())
    }

    /// イメージをバイト列に変換します。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_len());
        // Writing into a Vec cannot fail, and the lengths fit in u32 by construction.
        self.write(&mut buf)
            .unwrap_or_else(|e| unreachable!("writing into a Vec failed: {e}"));
        buf
    }

    /// イメージをファイルに書き出します。
    ///
    /// 同じディレクトリの一時ファイルに書き込んでから置き換えるため、
    /// 途中で失敗しても`path`に不完全なファイルが残ることはありません。
    ///
    /// # エラー
    ///
    /// 書き込みまたは一時ファイルの永続化に失敗した場合にエラーを返します。
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut tmp = temp_file_beside(path)?;
        self.write(BufWriter::new(tmp.as_file_mut()))?;
        tmp.persist(path)?;
        Ok(())
    }

    /// イメージをZstandardで圧縮してファイルに書き出します。
    ///
    /// [`write_to_path()`](Self::write_to_path)と同様に、出力は原子的に置き換えられます。
    ///
    /// # エラー
    ///
    /// 書き込み・圧縮・永続化に失敗した場合にエラーを返します。
    pub fn write_zstd_to_path<P: AsRef<Path>>(&self, path: P, level: i32) -> Result<()> {
        let path = path.as_ref();
        let mut tmp = temp_file_beside(path)?;
        {
            let mut encoder = zstd::Encoder::new(BufWriter::new(tmp.as_file_mut()), level)?;
            self.write(&mut encoder)?;
            encoder.finish()?.flush()?;
        }
        tmp.persist(path)?;
        Ok(())
    }
}

fn temp_file_beside(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Ok(NamedTempFile::new_in(dir)?)
}

/// 平坦化の途中で保持するノード情報
struct FlatNode<'a> {
    node: &'a TrieNode,
    char_code: u8,
    first_child: u32,
    child_count: u32,
}

/// メモリ上のトライを[`TrieImage`]に変換します。
///
/// # エラー
///
/// ノード数・子ノード数・文字コードがパック形式の容量を超える場合に
/// [`BuildError`]を返します。
pub(crate) fn serialize(root: &TrieNode) -> Result<TrieImage, BuildError> {
    let mut flat = vec![FlatNode {
        node: root,
        char_code: 0,
        first_child: 0,
        child_count: 0,
    }];
    let mut queue = VecDeque::from([0usize]);

    while let Some(parent) = queue.pop_front() {
        let parent_node = flat[parent].node;
        let mut children: Vec<_> = parent_node.children().collect();
        if children.is_empty() {
            continue;
        }
        children.sort_by_key(|&(code, c)| (c.best_rank().unwrap_or(num::UNRANKED), code));

        let first_child = flat.len();
        if first_child + children.len() > MAX_NODES {
            return Err(BuildError::TooManyNodes {
                count: first_child + children.len(),
                max: MAX_NODES,
            });
        }
        flat[parent].first_child = first_child as u32;
        flat[parent].child_count = children.len() as u32;
        for (code, node) in children {
            queue.push_back(flat.len());
            flat.push(FlatNode {
                node,
                char_code: code,
                first_child: 0,
                child_count: 0,
            });
        }
    }

    let mut nodes = Vec::with_capacity(flat.len());
    let mut pointers = Vec::with_capacity(flat.len());
    let mut ranks = vec![];
    for f in &flat {
        let packed = PackedNode::pack(
            f.first_child,
            f.child_count,
            f.node.is_end_of_word(),
            u32::from(f.char_code),
        )?;
        nodes.push(packed.0);

        // The rank stream stays far below 4 GiB: at most 2^20 nodes of 10 bytes.
        pointers.push(ranks.len() as u32);
        let best_rank = f.node.best_rank().unwrap_or(num::UNRANKED);
        varint::encode(best_rank, &mut ranks);
        if let Some(word_rank) = f.node.word_rank()
            && word_rank != best_rank
        {
            varint::encode(word_rank, &mut ranks);
        }
    }

    Ok(TrieImage {
        nodes,
        pointers,
        ranks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::builder::TrieBuilder;

    fn decode_chars(image: &TrieImage) -> Vec<(u8, bool)> {
        image
            .nodes()
            .map(|n| (n.char_code(), n.is_end_of_word()))
            .collect()
    }

    #[test]
    fn test_breadth_first_rank_order() {
        let image = TrieBuilder::from_words(["the", "there", "their", "where"])
            .build()
            .unwrap();
        // root, t w, h(t) h(w), e(the) e(whe), r(ther) i(thei) r(wher), e(there) r(their) e(where)
        let expected: Vec<(u8, bool)> = vec![
            (0, false),
            (20, false),
            (23, false),
            (8, false),
            (8, false),
            (5, true),
            (5, false),
            (18, false),
            (9, false),
            (18, false),
            (5, true),
            (18, true),
            (5, true),
        ];
        assert_eq!(decode_chars(&image), expected);

        let nodes: Vec<_> = image.nodes().collect();
        assert_eq!(nodes[0].children(), 1..3);
        assert_eq!(nodes[1].children(), 3..4);
        assert_eq!(nodes[5].children(), 7..9);
        for (i, n) in nodes.iter().enumerate() {
            if n.child_count() != 0 {
                assert!(n.first_child() as usize > i);
            }
        }
    }

    #[test]
    fn test_rank_stream() {
        let image = TrieBuilder::from_words(["b", "ab", "a"]).build().unwrap();
        // root(0) b(0) a(1, word 2) ab(1)
        assert_eq!(image.pointers, [0, 1, 2, 4]);
        assert_eq!(image.ranks, [0, 0, 1, 2, 1]);
    }

    #[test]
    fn test_header() {
        let image = TrieBuilder::from_words(["a"]).build().unwrap();
        let bytes = image.to_bytes();
        assert_eq!(bytes.len(), image.byte_len());
        assert_eq!(&bytes[0..4], &8u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &8u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2u32.to_le_bytes());
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trie.bin");
        let image = TrieBuilder::from_words(["hello", "help"]).build().unwrap();
        image.write_to_path(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), image.to_bytes());
    }
}
