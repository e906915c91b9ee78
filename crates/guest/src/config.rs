//! Sizes of the buffers the guest hands the host to write into.
//!
//! The host never allocates on the guest's behalf and most calls do not report how much they
//! need up front, so each call site reserves one of these.

use wes_abi_common::Len;
use wes_abi_common::ADDRESS_LEN;
use wes_abi_common::AMOUNT_BYTES;
use wes_abi_common::HASH_LEN;

/// state values, utxo and resource lookup json, controlled state query results
pub const DEFAULT_LOOKUP_CAPACITY: Len = 8192;
pub const RECEIPT_CAPACITY: Len = 4096;
pub const BASE58_CAPACITY: Len = 64;
pub const CHAIN_ID_CAPACITY: Len = 64;
/// claim ids handed back by `host_declare_external_state`
pub const CLAIM_ID_CAPACITY: Len = 64;

pub const ADDRESS_CAPACITY: Len = ADDRESS_LEN as Len;
pub const HASH_CAPACITY: Len = HASH_LEN as Len;
pub const VERSION_CAPACITY: Len = AMOUNT_BYTES as Len;

/// returned in place of an output index by the output appending calls
pub const OUTPUT_FAILED: u32 = 0xFFFF_FFFF;
