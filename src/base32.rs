//! Base32 codec for transportable secrets.
//!
//! RFC 4648 alphabet (`A-Z2-7`) without padding. Secrets and derived keys
//! move between the core and authenticator apps as this text form.
//!
//! Decoding is deliberately lenient: characters outside the alphabet are
//! discarded rather than rejected, so user input with spaces, dashes, or
//! lowercase letters still decodes. Malformed input never produces an error.

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encode raw bytes as unpadded Base32 text.
///
/// Each 5-byte input block becomes 8 output symbols. A final partial block
/// emits only the fewest symbols covering the bits present; no `=` padding
/// is ever produced. Deterministic, no failure mode.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for &byte in bytes {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }

    // Left-align the remaining bits into one final symbol.
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}

/// Decode Base32 text into raw bytes.
///
/// Case-insensitive. Characters outside the alphabet are silently skipped
/// before decoding. Produces `floor(valid_symbols * 5 / 8)` bytes; a
/// trailing fragment smaller than a byte is dropped. Empty or all-invalid
/// input yields an empty vec, never an error.
#[must_use]
pub fn decode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for c in text.chars() {
        let Some(value) = symbol_value(c) else {
            continue;
        };
        buffer = (buffer << 5) | u32::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }

    out
}

fn symbol_value(c: char) -> Option<u8> {
    match c.to_ascii_uppercase() {
        c @ 'A'..='Z' => Some(c as u8 - b'A'),
        c @ '2'..='7' => Some(c as u8 - b'2' + 26),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4648_vectors_no_padding() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "MY");
        assert_eq!(encode(b"fo"), "MZXQ");
        assert_eq!(encode(b"foo"), "MZXW6");
        assert_eq!(encode(b"foob"), "MZXW6YQ");
        assert_eq!(encode(b"fooba"), "MZXW6YTB");
        assert_eq!(encode(b"foobar"), "MZXW6YTBOI");
    }

    #[test]
    fn test_rfc6238_reference_secret() {
        assert_eq!(
            encode(b"12345678901234567890"),
            "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"
        );
    }

    #[test]
    fn test_round_trip_all_lengths() {
        for len in 0..=64usize {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 37 % 251) as u8).collect();
            assert_eq!(decode(&encode(&bytes)), bytes, "length {}", len);
        }
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("mzxw6ytboi"), decode("MZXW6YTBOI"));
        assert_eq!(decode("mZxW6yTbOi"), b"foobar");
    }

    #[test]
    fn test_decode_discards_invalid_characters() {
        assert_eq!(decode("MZXW 6YTB-OI"), b"foobar");
        assert_eq!(decode("MZ=XW6YT!B0O1I"), b"foobar"); // 0 and 1 are not in the alphabet
    }

    #[test]
    fn test_decode_empty_and_all_invalid() {
        assert!(decode("").is_empty());
        assert!(decode("!@# 019").is_empty());
    }

    #[test]
    fn test_decode_truncates_trailing_fragment() {
        // One symbol is 5 bits, less than a byte.
        assert!(decode("M").is_empty());
        // Two symbols cover exactly one byte plus a 2-bit fragment.
        assert_eq!(decode("MY").len(), 1);
    }

    #[test]
    fn test_output_byte_count() {
        for (text, expected) in [("", 0), ("MY", 1), ("MZXQ", 2), ("MZXW6", 3)] {
            assert_eq!(decode(text).len(), expected);
            assert_eq!(text.len() * 5 / 8, expected);
        }
    }
}
