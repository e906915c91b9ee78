//! Records the host hands back from lookups, and the outcome of a finalised transaction.

use crate::base64;
use crate::json::extract_json_object;
use crate::json::find_json_field;
use crate::json::parse_uint64;
use crate::result::ErrorCode;
use crate::types::Address;
use crate::types::Amount;
use crate::types::Hash;
use crate::types::ADDRESS_LEN;
use serde::{Deserialize, Serialize};

/// Reference to one output of a prior transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub tx_hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum OutputType {
    #[default]
    Asset = 0,
    Resource = 1,
    State = 2,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub output_type: OutputType,
    /// only meaningful for asset outputs
    pub recipient: Option<Address>,
    pub amount: Amount,
    pub token_id: Option<String>,
    /// the raw lookup payload this output was decoded from
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub out_point: OutPoint,
    pub output: TxOutput,
}

/// true when `key` is present with either a scalar or an object value
fn has_member(json: &str, key: &str) -> bool {
    !find_json_field(json, key).is_empty() || !extract_json_object(json, key).is_empty()
}

impl Utxo {
    /// Decodes the JSON written by `utxo_lookup_json`.
    ///
    /// The output type is the first of `asset`, `state`, `resource` present, asset when none
    /// are. `owner` is base64 and only its first 20 bytes are kept; a short or undecodable
    /// owner leaves the recipient unset. Amount and token id are read from the `asset` object.
    pub fn from_lookup_json(out_point: OutPoint, json: &str) -> Self {
        let output_type = if has_member(json, "asset") {
            OutputType::Asset
        } else if has_member(json, "state") {
            OutputType::State
        } else if has_member(json, "resource") {
            OutputType::Resource
        } else {
            OutputType::Asset
        };

        let owner = base64::decode_or_empty(find_json_field(json, "owner"));
        let recipient = owner
            .get(..ADDRESS_LEN)
            .and_then(|bytes| Address::try_from(bytes).ok());

        let mut output = TxOutput {
            output_type,
            recipient,
            ..Default::default()
        };
        if output_type == OutputType::Asset {
            let asset = extract_json_object(json, "asset");
            output.amount = parse_uint64(find_json_field(asset, "amount"));
            output.token_id = match find_json_field(asset, "tokenId") {
                "" => None,
                token_id => Some(token_id.to_string()),
            };
        }
        Self { out_point, output }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ResourceCategory {
    #[default]
    Static = 0,
    Executable = 1,
}

impl ResourceCategory {
    /// `EXECUTABLE` by name or `1` by number, everything else is static
    pub fn from_field(value: &str) -> Self {
        match value {
            "EXECUTABLE" | "1" => Self::Executable,
            _ => Self::Static,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub content_hash: Hash,
    pub category: ResourceCategory,
    pub mime_type: String,
    pub size: u64,
}

impl Resource {
    /// Decodes the JSON written by `resource_lookup_json`. Missing fields take their defaults.
    pub fn from_lookup_json(content_hash: Hash, json: &str) -> Self {
        Self {
            content_hash,
            category: ResourceCategory::from_field(find_json_field(json, "category")),
            mime_type: find_json_field(json, "mimeType").to_string(),
            size: parse_uint64(find_json_field(json, "size")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResult {
    #[serde(with = "serde_bytes")]
    pub value: Vec<u8>,
    pub version: u64,
}

/// Outcome of finalising a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub success: bool,
    pub code: ErrorCode,
}

impl TransactionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: ErrorCode::Success,
        }
    }

    pub fn failed(code: ErrorCode) -> Self {
        Self {
            success: false,
            code,
        }
    }
}

impl From<crate::result::AbiError> for TransactionResult {
    fn from(e: crate::result::AbiError) -> Self {
        Self::failed(e.code())
    }
}
