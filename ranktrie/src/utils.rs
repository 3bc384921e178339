//! ユーティリティ関数と型変換トレイトを提供するモジュール
//!
//! - `FromU32`: u32からの型変換トレイト
//! - 文字と文字コードの相互変換
//! - クエリ文字列の正規化

/// アルファベットの文字数
pub const ALPHABET_SIZE: usize = 26;

/// u32から他の型への変換を提供するトレイト
///
/// ノードインデックスはu32で保持されるため、配列添字への変換に使用します。
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// 小文字のASCII英字を文字コード(`'a'` = 1 ... `'z'` = 26)に変換します。
///
/// それ以外の文字は`None`になります。コード0はルートノード用に予約されています。
#[inline(always)]
pub const fn char_to_code(c: u8) -> Option<u8> {
    if c.is_ascii_lowercase() {
        Some(c - b'a' + 1)
    } else {
        None
    }
}

/// 文字コードを小文字のASCII英字に変換します。
#[inline(always)]
pub const fn code_to_char(code: u8) -> u8 {
    b'a' + code - 1
}

/// 単語を正規化します。
///
/// ASCII英字を小文字にし、それ以外の文字をすべて取り除きます。
///
/// # 例
///
/// ```
/// # use ranktrie::utils::normalize_word;
/// assert_eq!(normalize_word("Don't"), "dont");
/// assert_eq!(normalize_word("  café "), "caf");
/// assert_eq!(normalize_word("42"), "");
/// ```
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
