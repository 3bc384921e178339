//! 可変長整数(LEB128)の符号化
//!
//! 下位7ビットずつ出力し、続きがあるバイトには最上位ビットを立てます。

/// u32の符号化に必要な最大バイト数
pub const MAX_VARINT_LEN: usize = 5;

/// 値を可変長整数として`buf`の末尾に追加します。
///
/// # 戻り値
///
/// 書き込んだバイト数
pub fn encode(mut value: u32, buf: &mut Vec<u8>) -> usize {
    let start = buf.len();
    while value >= 0x80 {
        buf.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
    buf.len() - start
}

/// `bytes`の先頭から可変長整数を1つ復号します。
///
/// # 戻り値
///
/// 復号した値と消費したバイト数。入力が途中で途切れている場合や
/// u32に収まらない場合は`None`を返します。
pub fn decode(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &b) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        let payload = u32::from(b & 0x7f);
        let shift = 7 * i as u32;
        if i == MAX_VARINT_LEN - 1 && payload > 0x0f {
            return None;
        }
        value |= payload << shift;
        if b & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
