//! Minimal ABI return-value decoding for the two shapes an ERC-20's
//! `symbol()` is seen to return in the wild: a dynamic `string` (the
//! standard encoding) or a fixed `bytes32` (a handful of legacy tokens,
//! e.g. early MKR, encode it this way).

/// The 4-byte selector for `symbol()`.
pub const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
/// The 4-byte selector for `decimals()`.
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Decodes a `symbol()` return value as either a dynamic ABI string or a
/// raw `bytes32`, trimming trailing NUL padding either way. Returns `None`
/// if the bytes don't look like either shape.
pub fn decode_symbol(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    // Dynamic `string`: a 32-byte head holding the offset (conventionally
    // 0x20), then a 32-byte length, then the UTF-8 bytes, NUL-padded to a
    // multiple of 32.
    if data.len() >= 64 {
        let offset = u256_to_usize(&data[0..32]);
        if offset == 32 {
            let length = u256_to_usize(&data[32..64]);
            let start = 64;
            if length > 0 && data.len() >= start + length {
                if let Ok(s) = std::str::from_utf8(&data[start..start + length]) {
                    return Some(s.trim_end_matches('\0').to_string());
                }
            }
        }
    }

    // Fixed `bytes32`: exactly 32 bytes, NUL-padded on the right.
    if data.len() == 32 {
        let trimmed: Vec<u8> = data.iter().copied().take_while(|&b| b != 0).collect();
        if let Ok(s) = std::str::from_utf8(&trimmed) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }

    None
}

/// Decodes a `decimals()` return value: a 32-byte word whose low byte
/// holds a `uint8`.
pub fn decode_decimals(data: &[u8]) -> Option<u32> {
    if data.len() < 32 {
        return None;
    }
    Some(u32::from(data[31]))
}

fn u256_to_usize(word: &[u8]) -> usize {
    word.iter().fold(0usize, |acc, &b| {
        acc.wrapping_shl(8).wrapping_add(usize::from(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_dynamic_string_symbol() {
        let mut data = vec![0u8; 32];
        data[31] = 0x20; // offset = 32
        let mut length = vec![0u8; 32];
        length[31] = 4; // length = 4
        data.extend(length);
        let mut payload = b"USDC".to_vec();
        payload.resize(32, 0);
        data.extend(payload);

        assert_eq!(decode_symbol(&data).as_deref(), Some("USDC"));
    }

    #[test]
    fn decodes_fixed_bytes32_symbol() {
        let mut data = vec![0u8; 32];
        data[..3].copy_from_slice(b"MKR");
        assert_eq!(decode_symbol(&data).as_deref(), Some("MKR"));
    }

    #[test]
    fn decodes_decimals_word() {
        let mut data = vec![0u8; 32];
        data[31] = 6;
        assert_eq!(decode_decimals(&data), Some(6));
    }

    #[test]
    fn empty_response_decodes_to_none() {
        assert_eq!(decode_symbol(&[]), None);
        assert_eq!(decode_decimals(&[]), None);
    }
}
