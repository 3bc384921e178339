//! 頻度順位に関する定数と補助関数を提供するモジュール
//!
//! 単語リストの並び順(0が最頻出)をそのまま順位として扱います。
//! ランクテーブルでは「このノード以下に単語がない」ことを番兵値
//! [`UNRANKED`]で表すため、実際の順位はそれより小さい必要があります。

/// 単語を持たないノードを表す番兵値
///
/// 元のフォーマットとの互換性のため、u16の最大値を使用します。
pub const UNRANKED: u32 = 0xffff;

/// 順位として表現可能な最大値
pub const MAX_RANK: u32 = UNRANKED - 1;

/// 順位が番兵値未満かどうかを判定する
///
/// # 例
///
/// ```
/// # use ranktrie::num::is_valid_rank;
/// assert!(is_valid_rank(0));
/// assert!(is_valid_rank(65534));
/// assert!(!is_valid_rank(65535));
/// ```
#[inline(always)]
pub const fn is_valid_rank(x: u32) -> bool {
    x <= MAX_RANK
}

/// 復号した値を番兵値で飽和させます。
///
/// 番兵値を超える値はすべて番兵値として扱われます。
#[inline(always)]
pub const fn saturate(x: u32) -> u32 {
    if x > UNRANKED { UNRANKED } else { x }
}
