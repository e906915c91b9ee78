use crate::result::AbiError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ADDRESS_LEN: usize = 20;
pub const HASH_LEN: usize = 32;
/// every fixed-width numeric crosses the boundary as exactly this many little endian bytes
pub const AMOUNT_BYTES: usize = 8;

pub type Amount = u64;

/// 20 byte account address.
///
/// The canonical text form (Base58) is owned by the host. Hex is the fallback used in drafts
/// and debug output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// 32 byte content identity value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; HASH_LEN]);

macro_rules! fixed_bytes {
    ( $name:ident, $len:expr ) => {
        impl $name {
            pub const ZERO: $name = $name([0; $len]);

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            pub fn to_hex(&self) -> String {
                crate::hex::bytes_to_hex(&self.0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = AbiError;
            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                Ok(Self(bytes.try_into().map_err(|_| {
                    AbiError::Malformed(format!(
                        "expected {} bytes for {}, got {}",
                        $len,
                        stringify!($name),
                        bytes.len()
                    ))
                })?))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }
    };
}

fixed_bytes!(Address, ADDRESS_LEN);
fixed_bytes!(Hash, HASH_LEN);

/// read all 8 bytes of a little endian u64, even when the value itself is small
pub fn u64_from_le(bytes: &[u8]) -> Result<u64, AbiError> {
    let fixed: [u8; AMOUNT_BYTES] = bytes
        .get(..AMOUNT_BYTES)
        .ok_or_else(|| AbiError::Malformed(format!("expected {} bytes for u64", AMOUNT_BYTES)))?
        .try_into()?;
    Ok(u64::from_le_bytes(fixed))
}
