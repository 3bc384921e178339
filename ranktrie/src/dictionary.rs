//! 補完のための辞書モジュール。
//!
//! このモジュールは、頻度順位付きトライの構築、シリアライズ、読み込みを行います。
//!
//! # バイナリフォーマット
//!
//! すべてリトルエンディアンです。
//!
//! ```text
//! [u32 structureLen][u32 pointerLen][u32 rankLen]
//! [structureLen bytes: パック済みノードレコード (各4バイト)]
//! [pointerLen bytes: 各ノードの順位バイト列内オフセット (各4バイト)]
//! [rankLen bytes: 各ノードの最小順位 (可変長整数)]
//! ```
//!
//! ノードは幅優先順に並び、兄弟ノードは最小順位の昇順に格納されます。
//! 単語終端ノードのうち、自身の単語の順位が最小順位と異なるものは、
//! 最小順位の直後に単語の順位を続けて格納します。この追加の値は
//! 次のノードのオフセットとの隙間からのみ検出されるため、
//! 追加の値を持たないファイルもそのまま読み込めます。
//!
//! # 辞書の読み込み方法
//!
//! - [`Dictionary::from_bytes`]: メモリ上のバイト列から読み込む
//! - [`Dictionary::read`]: リーダーから読み込む
//! - [`Dictionary::from_path`]: ファイルパスから読み込む
//! - [`Dictionary::from_zstd`]: Zstandard圧縮ファイルから読み込む
pub mod builder;
pub mod node;
pub(crate) mod serializer;
pub(crate) mod varint;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use crate::errors::{RankTrieError, Result};
use crate::num;
use crate::utils::{char_to_code, code_to_char, FromU32};

pub use crate::dictionary::builder::{TrieBuilder, TrieNode};
pub use crate::dictionary::node::PackedNode;
pub use crate::dictionary::serializer::{TrieImage, HEADER_LEN};

/// ルートノードのインデックス
pub const ROOT: u32 = 0;

/// 補完のための読み取り専用辞書。
///
/// 読み込み後は変更されないため、`Arc`で包んで複数のスレッドから
/// ロックなしで共有できます。
pub struct Dictionary {
    nodes: Vec<PackedNode>,
    best_ranks: Vec<u32>,
    word_ranks: Vec<u32>,
}

impl Dictionary {
    /// バイト列から辞書を読み込みます。
    ///
    /// 順位バイト列は読み込み時にすべて固定幅の配列へ展開されるため、
    /// クエリ時の順位参照はO(1)です。
    ///
    /// # エラー
    ///
    /// 以下の場合に[`RankTrieError::InvalidFormat`]を返します:
    /// - バイト列がヘッダより短い場合
    /// - 宣言された各バッファの長さが残りのバイト数を超える場合
    /// - ノード配列・ポインタ配列の長さが4の倍数でない場合
    /// - ノード数とポインタ数が一致しない、またはノードが1つもない場合
    /// - 子ノードの範囲、文字コード、オフセット、可変長整数が不正な場合
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(header) = bytes.get(..HEADER_LEN) else {
            return Err(RankTrieError::invalid_format(
                "header",
                format!("expected at least {HEADER_LEN} bytes, got {}", bytes.len()),
            ));
        };
        let structure_len = usize::from_u32(read_u32_le(&header[0..4]));
        let pointer_len = usize::from_u32(read_u32_le(&header[4..8]));
        let rank_len = usize::from_u32(read_u32_le(&header[8..12]));

        let body = &bytes[HEADER_LEN..];
        let total = structure_len
            .checked_add(pointer_len)
            .and_then(|n| n.checked_add(rank_len));
        match total {
            Some(total) if total <= body.len() => {
                if total < body.len() {
                    log::debug!(
                        "[ranktrie] ignoring {} trailing bytes after the rank stream",
                        body.len() - total
                    );
                }
            }
            _ => {
                return Err(RankTrieError::invalid_format(
                    "header",
                    format!(
                        "declared lengths {structure_len} + {pointer_len} + {rank_len} exceed the remaining {} bytes",
                        body.len()
                    ),
                ));
            }
        }
        if structure_len % 4 != 0 {
            return Err(RankTrieError::invalid_format(
                "structure",
                format!("length {structure_len} is not a multiple of 4"),
            ));
        }
        if pointer_len % 4 != 0 {
            return Err(RankTrieError::invalid_format(
                "pointers",
                format!("length {pointer_len} is not a multiple of 4"),
            ));
        }

        let (structure, rest) = body.split_at(structure_len);
        let (pointers, rest) = rest.split_at(pointer_len);
        let ranks = &rest[..rank_len];

        let nodes: Vec<PackedNode> = structure
            .chunks_exact(4)
            .map(|c| PackedNode(read_u32_le(c)))
            .collect();
        let pointers: Vec<u32> = pointers.chunks_exact(4).map(read_u32_le).collect();

        if nodes.is_empty() {
            return Err(RankTrieError::invalid_format("structure", "no root node"));
        }
        if nodes.len() != pointers.len() {
            return Err(RankTrieError::invalid_format(
                "pointers",
                format!("{} pointers for {} nodes", pointers.len(), nodes.len()),
            ));
        }
        Self::verify_structure(&nodes)?;
        let (best_ranks, word_ranks) = Self::decode_ranks(&nodes, &pointers, ranks)?;

        log::debug!("[ranktrie] loaded trie: {} nodes", nodes.len());
        Ok(Self {
            nodes,
            best_ranks,
            word_ranks,
        })
    }

    /// ノード配列が幅優先順に並んだ木であることを検証します。
    ///
    /// 各ノードの子の範囲は前方を指し、親の順に隙間なく連続していなければなりません。
    /// これにより、すべての非根ノードはちょうど1つの親を持ちます。
    fn verify_structure(nodes: &[PackedNode]) -> Result<()> {
        let num_nodes = nodes.len();
        let mut expected_first = 1;
        for (i, node) in nodes.iter().enumerate() {
            if i != 0 && !(1..=26).contains(&node.char_code()) {
                return Err(RankTrieError::invalid_format(
                    "structure",
                    format!("node {i} has an invalid character code {}", node.char_code()),
                ));
            }
            if node.child_count() == 0 {
                continue;
            }
            let first = usize::from_u32(node.first_child());
            let end = first + usize::from_u32(node.child_count());
            if first <= i || first != expected_first || end > num_nodes {
                return Err(RankTrieError::invalid_format(
                    "structure",
                    format!("node {i} has an invalid child range {first}..{end}"),
                ));
            }
            expected_first = end;
        }
        if expected_first != num_nodes {
            return Err(RankTrieError::invalid_format(
                "structure",
                format!("{} of {num_nodes} nodes have no parent", num_nodes - expected_first),
            ));
        }
        Ok(())
    }

    /// 順位バイト列を固定幅の配列に展開します。
    fn decode_ranks(
        nodes: &[PackedNode],
        pointers: &[u32],
        ranks: &[u8],
    ) -> Result<(Vec<u32>, Vec<u32>)> {
        let mut best_ranks = Vec::with_capacity(nodes.len());
        let mut word_ranks = Vec::with_capacity(nodes.len());
        for (i, (node, &ptr)) in nodes.iter().zip(pointers).enumerate() {
            let start = usize::from_u32(ptr);
            let (best, len) = ranks
                .get(start..)
                .and_then(varint::decode)
                .ok_or_else(|| {
                    RankTrieError::invalid_format(
                        "ranks",
                        format!("node {i} points to an invalid rank at offset {start}"),
                    )
                })?;
            let best = num::saturate(best);
            let end = start + len;
            let next = pointers
                .get(i + 1)
                .map_or(ranks.len(), |&p| usize::from_u32(p));

            let word = if node.is_end_of_word() && next > end {
                let (word, _) = varint::decode(&ranks[end..]).ok_or_else(|| {
                    RankTrieError::invalid_format(
                        "ranks",
                        format!("node {i} has a truncated word rank at offset {end}"),
                    )
                })?;
                num::saturate(word)
            } else {
                best
            };
            best_ranks.push(best);
            word_ranks.push(word);
        }
        Ok((best_ranks, word_ranks))
    }

    /// リーダーからすべてのデータを読み込んで辞書を作成します。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、またはデータが不正な場合にエラーを返します。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// メモリマッピングを使用してファイルパスから辞書を作成します。
    ///
    /// # エラー
    ///
    /// ファイルを開けない場合、またはデータが不正な場合にエラーを返します。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            RankTrieError::invalid_argument("path", format!("Failed to open trie file: {e}"))
        })?;
        // SAFETY: the mapping is only read while decoding and dropped before returning.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    /// Zstandardで圧縮されたファイルから辞書を作成します。
    ///
    /// # エラー
    ///
    /// ファイルを開けない場合、展開に失敗した場合、またはデータが不正な場合に
    /// エラーを返します。
    pub fn from_zstd<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            RankTrieError::invalid_argument("path", format!("Failed to open trie file: {e}"))
        })?;
        let decoder = zstd::Decoder::new(file)?;
        Self::read(decoder)
    }

    /// ノード数
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// 指定されたノードのレコードを取得します。
    #[inline(always)]
    pub fn node(&self, id: u32) -> PackedNode {
        self.nodes[usize::from_u32(id)]
    }

    /// 指定されたノードを通る単語の最小順位を取得します。
    ///
    /// 単語を持たないノードでは[`num::UNRANKED`]になります。
    #[inline(always)]
    pub fn best_rank(&self, id: u32) -> u32 {
        self.best_ranks[usize::from_u32(id)]
    }

    /// 指定されたノードで終わる単語の順位を取得します。
    ///
    /// 単語終端でないノードでは最小順位と同じ値になります。
    #[inline(always)]
    pub fn word_rank(&self, id: u32) -> u32 {
        self.word_ranks[usize::from_u32(id)]
    }

    /// 指定されたノードの子から、文字コードが一致するものを探します。
    ///
    /// 兄弟ノードは順位順に並んでいるため、線形探索になります。
    #[inline(always)]
    pub fn find_child(&self, id: u32, code: u8) -> Option<u32> {
        self.node(id)
            .children()
            .find(|&c| self.node(c).char_code() == code)
    }

    /// 接頭辞をたどって到達するノードを返します。
    ///
    /// 途中の文字が存在しない場合、または小文字のASCII英字以外を含む場合は
    /// `None`を返します。空文字列はルートノードになります。
    pub fn resolve(&self, prefix: &str) -> Option<u32> {
        prefix.bytes().try_fold(ROOT, |id, c| {
            char_to_code(c).and_then(|code| self.find_child(id, code))
        })
    }

    /// 単語が辞書に含まれるかどうかを返します。
    pub fn is_word(&self, word: &str) -> bool {
        self.resolve(word)
            .is_some_and(|id| self.node(id).is_end_of_word())
    }

    /// 辞書に含まれるすべての単語を順位の昇順で列挙します。
    pub fn words(&self) -> Vec<(String, u32)> {
        let mut words = vec![];
        let mut stack = vec![(ROOT, String::new())];
        while let Some((id, word)) = stack.pop() {
            let node = self.node(id);
            for child in node.children() {
                let mut next = word.clone();
                next.push(char::from(code_to_char(self.node(child).char_code())));
                stack.push((child, next));
            }
            if node.is_end_of_word() {
                words.push((word, self.word_rank(id)));
            }
        }
        words.sort_by(|(wa, ra), (wb, rb)| ra.cmp(rb).then_with(|| wa.cmp(wb)));
        words
    }
}

#[inline(always)]
fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
