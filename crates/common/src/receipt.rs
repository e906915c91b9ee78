//! Receipts written back by `host_build_transaction`.
//!
//! The host fills a fixed size buffer and does not report how much of it it used, so the
//! payload length is recovered by scanning backwards over trailing padding for the closing brace.

use crate::result::AbiError;
use crate::result::ErrorCode;
use serde::{Deserialize, Serialize};

/// padding the host may leave after the receipt object
fn is_padding(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0)
}

/// Index one past the last `}` when only padding follows it, otherwise 0.
#[cfg_attr(feature = "fuzzing", test_fuzz::test_fuzz)]
pub fn find_json_end(data: &[u8]) -> usize {
    for (i, byte) in data.iter().enumerate().rev() {
        if *byte == b'}' {
            return i + 1;
        }
        if !is_padding(*byte) {
            break;
        }
    }
    0
}

/// `"error"` counts as set unless it is missing, `null` or `""`.
///
/// Only the first character of the value is looked at, so `"error":nope` is also treated as
/// unset and `"error":0` as set.
#[cfg_attr(feature = "fuzzing", test_fuzz::test_fuzz)]
pub fn has_error(receipt: &str) -> bool {
    let bytes = receipt.as_bytes();
    let key = match receipt.find("\"error\"") {
        Some(key) => key,
        None => return false,
    };
    let colon = match receipt[key..].find(':') {
        Some(colon) => key + colon,
        None => return false,
    };
    let mut i = colon + 1;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'n') => false,
        Some(b'"') => bytes.get(i + 1) != Some(&b'"'),
        _ => true,
    }
}

/// A receipt that has been trimmed and checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub json: String,
}

impl Receipt {
    /// Trims `raw` to its JSON payload and rejects empty or failed receipts.
    ///
    /// Every failure maps to ExecutionFailed, which is all the host contract lets us say about a
    /// receipt we could not use.
    pub fn parse(raw: &[u8]) -> Result<Self, AbiError> {
        let end = find_json_end(raw);
        if end == 0 {
            return Err(AbiError::Host(ErrorCode::ExecutionFailed));
        }
        let json = std::str::from_utf8(&raw[..end])
            .map_err(|_| AbiError::Host(ErrorCode::ExecutionFailed))?;
        if has_error(json) {
            return Err(AbiError::Host(ErrorCode::ExecutionFailed));
        }
        Ok(Self {
            json: json.to_string(),
        })
    }

    pub fn field(&self, key: &str) -> &str {
        crate::json::find_json_field(&self.json, key)
    }
}
