//! 32ビットにパックされたノードレコード
//!
//! | ビット | 内容 |
//! |--------|------|
//! | 0–19   | 最初の子ノードの絶対インデックス |
//! | 20–25  | 子ノード数 (0–63) |
//! | 26     | 単語終端フラグ |
//! | 27–31  | 親からこのノードに到達する文字コード (1–26、ルートは0) |

use crate::errors::BuildError;

const FIRST_CHILD_BITS: u32 = 20;
const CHILD_COUNT_BITS: u32 = 6;
const CHILD_COUNT_SHIFT: u32 = FIRST_CHILD_BITS;
const END_OF_WORD_SHIFT: u32 = CHILD_COUNT_SHIFT + CHILD_COUNT_BITS;
const CHAR_CODE_SHIFT: u32 = END_OF_WORD_SHIFT + 1;

const FIRST_CHILD_MASK: u32 = (1 << FIRST_CHILD_BITS) - 1;
const CHILD_COUNT_MASK: u32 = (1 << CHILD_COUNT_BITS) - 1;

/// 最初の子インデックスとして表現可能な最大値
pub const MAX_NODE_INDEX: u32 = FIRST_CHILD_MASK;

/// 表現可能な最大ノード数
pub const MAX_NODES: usize = MAX_NODE_INDEX as usize + 1;

/// 1ノードあたりの最大子ノード数
pub const MAX_CHILD_COUNT: u32 = CHILD_COUNT_MASK;

/// 文字コードとして表現可能な最大値
pub const MAX_CHAR_CODE: u32 = (1 << (32 - CHAR_CODE_SHIFT)) - 1;

/// 1ノード分のパック済みレコード
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash)]
#[repr(transparent)]
pub struct PackedNode(pub u32);

impl PackedNode {
    /// 各フィールドからレコードを作成します。
    ///
    /// # エラー
    ///
    /// いずれかのフィールドがビット幅を超える場合に[`BuildError`]を返します。
    pub fn pack(
        first_child: u32,
        child_count: u32,
        is_end_of_word: bool,
        char_code: u32,
    ) -> Result<Self, BuildError> {
        if first_child > MAX_NODE_INDEX {
            return Err(BuildError::TooManyNodes {
                count: first_child as usize + 1,
                max: MAX_NODES,
            });
        }
        if child_count > MAX_CHILD_COUNT {
            return Err(BuildError::TooManyChildren {
                count: child_count as usize,
                max: MAX_CHILD_COUNT as usize,
            });
        }
        if char_code > MAX_CHAR_CODE {
            return Err(BuildError::InvalidCharCode { code: char_code });
        }
        Ok(Self(
            first_child
                | (child_count << CHILD_COUNT_SHIFT)
                | (u32::from(is_end_of_word) << END_OF_WORD_SHIFT)
                | (char_code << CHAR_CODE_SHIFT),
        ))
    }

    #[inline(always)]
    pub const fn first_child(self) -> u32 {
        self.0 & FIRST_CHILD_MASK
    }

    #[inline(always)]
    pub const fn child_count(self) -> u32 {
        (self.0 >> CHILD_COUNT_SHIFT) & CHILD_COUNT_MASK
    }

    #[inline(always)]
    pub const fn is_end_of_word(self) -> bool {
        (self.0 >> END_OF_WORD_SHIFT) & 1 == 1
    }

    #[inline(always)]
    pub const fn char_code(self) -> u8 {
        (self.0 >> CHAR_CODE_SHIFT) as u8
    }

    /// 子ノードのインデックス範囲を返します。
    #[inline(always)]
    pub const fn children(self) -> std::ops::Range<u32> {
        let first = self.first_child();
        first..first + self.child_count()
    }
}
