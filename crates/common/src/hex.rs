//! The one hex codec for addresses, token ids and debug output.
//! Lowercase, no prefix unless asked for.

use crate::result::AbiError;

pub const HEX_PREFIX: &str = "0x";

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

pub fn bytes_to_hex_with_prefix(bytes: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, bytes_to_hex(bytes))
}

/// hex of the utf-8 bytes of `s`, the encoding drafts use for token ids
pub fn string_to_hex(s: &str) -> String {
    bytes_to_hex(s.as_bytes())
}

/// Accepts either case and an optional `0x` prefix. Odd length input is rejected rather than
/// left-padded.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>, AbiError> {
    let digits = text.strip_prefix(HEX_PREFIX).unwrap_or(text);
    Ok(::hex::decode(digits)?)
}

#[cfg(test)]
pub mod tests {
    use crate::hex;

    #[test]
    fn bytes_to_hex_test() {
        assert_eq!("", hex::bytes_to_hex(&[]));
        assert_eq!("00ff10ab", hex::bytes_to_hex(&[0x00, 0xff, 0x10, 0xab]));
        assert_eq!("0x00ff", hex::bytes_to_hex_with_prefix(&[0x00, 0xff]));
        assert_eq!("544f4b454e", hex::string_to_hex("TOKEN"));
    }

    #[test]
    fn hex_to_bytes_test() {
        assert_eq!(vec![0xab, 0xcd], hex::hex_to_bytes("abcd").unwrap());
        assert_eq!(vec![0xab, 0xcd], hex::hex_to_bytes("0xABcd").unwrap());
        assert_eq!(Vec::<u8>::new(), hex::hex_to_bytes("0x").unwrap());
        assert!(hex::hex_to_bytes("abc").is_err());
        assert!(hex::hex_to_bytes("zz").is_err());
    }
}
