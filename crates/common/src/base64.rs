//! Standard alphabet base64 used for binary values embedded in JSON text.
//!
//! Padding is emitted on encode. On decode every `=` is stripped before the remaining
//! characters are grouped, so padding is accepted anywhere and may also be omitted.

use crate::result::AbiError;
use ::base64::alphabet;
use ::base64::engine::general_purpose::GeneralPurpose;
use ::base64::engine::general_purpose::GeneralPurposeConfig;
use ::base64::engine::general_purpose::STANDARD;
use ::base64::engine::DecodePaddingMode;
use ::base64::DecodeError;
use ::base64::Engine;

const PAD: u8 = b'=';

/// standard alphabet that takes padding or leaves it out and ignores leftover low bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes `text`, failing on the first byte outside the alphabet.
///
/// A final group of 2 or 3 characters yields 1 or 2 bytes. A lone final character cannot carry
/// a whole byte and is rejected.
#[cfg_attr(feature = "fuzzing", test_fuzz::test_fuzz)]
pub fn decode(text: &str) -> Result<Vec<u8>, AbiError> {
    // positions[i] is where symbols[i] sits in `text`
    let (symbols, positions): (Vec<u8>, Vec<usize>) = text
        .bytes()
        .enumerate()
        .filter(|(_, byte)| *byte != PAD)
        .map(|(position, byte)| (byte, position))
        .unzip();

    LENIENT.decode(&symbols).map_err(|e| {
        let index = match e {
            DecodeError::InvalidByte(offset, _) | DecodeError::InvalidLastSymbol(offset, _) => {
                offset
            }
            // a dangling final symbol, blame the last one
            _ => symbols.len().saturating_sub(1),
        };
        let position = positions.get(index).copied().unwrap_or(text.len());
        AbiError::Base64 {
            byte: text.as_bytes().get(position).copied().unwrap_or(PAD),
            position,
        }
    })
}

/// sentinel form of [`decode`] for call sites that must stay total
pub fn decode_or_empty(text: &str) -> Vec<u8> {
    decode(text).unwrap_or_default()
}
