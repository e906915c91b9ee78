use serde::{Deserialize, Serialize};
use wes_abi_common::base64;
use wes_abi_common::json::find_json_field;
use wes_abi_common::json::parse_amount_field;
use wes_abi_common::json::stringify_pairs;
use wes_abi_common::Address;
use wes_abi_common::Amount;

pub const ALICE: Address = Address([0xa1; 20]);
pub const BOB: Address = Address([0xb0; 20]);
pub const VALIDATOR: Address = Address([0x7a; 20]);

/// A token transfer as a contract would receive it in its call parameters.
#[derive(PartialEq, Clone, Deserialize, Serialize, Debug)]
pub struct TransferRequest {
    pub to: Address,
    pub amount: Amount,
    pub token_id: Option<String>,
}

impl TransferRequest {
    pub fn new(to: Address, amount: Amount, token_id: Option<&str>) -> Self {
        Self {
            to,
            amount,
            token_id: token_id.map(str::to_string),
        }
    }

    /// `{"to":"<hex>","amount":"<n>","token_id":"<id>"}`, the shape the host delivers
    pub fn to_params_json(&self) -> String {
        let amount = self.amount.to_string();
        let to = self.to.to_hex();
        let mut pairs = vec![("to", to.as_str()), ("amount", amount.as_str())];
        if let Some(token_id) = &self.token_id {
            pairs.push(("token_id", token_id.as_str()));
        }
        stringify_pairs(&pairs)
    }

    /// inverse of [`Self::to_params_json`], `None` when `to` is not a hex address
    pub fn from_params_json(json: &str) -> Option<Self> {
        let to = wes_abi_common::hex::hex_to_bytes(find_json_field(json, "to")).ok()?;
        let token_id = match find_json_field(json, "token_id") {
            "" => None,
            token_id => Some(token_id.to_string()),
        };
        Some(Self {
            to: Address::try_from(to.as_slice()).ok()?,
            amount: parse_amount_field(json, "amount"),
            token_id,
        })
    }
}

/// the json a host writes for an asset utxo lookup
pub fn asset_utxo_json(owner: &Address, amount: Amount, token_id: Option<&str>) -> String {
    let token = match token_id {
        Some(id) => format!(r#","tokenId":"{}""#, id),
        None => String::new(),
    };
    format!(
        r#"{{"owner":"{}","asset":{{"amount":"{}"{}}}}}"#,
        base64::encode(owner.as_bytes()),
        amount,
        token
    )
}

/// the json a host writes for a resource lookup
pub fn resource_json(category: &str, mime_type: &str, size: u64) -> String {
    format!(
        r#"{{"category":"{}","mimeType":"{}","size":"{}"}}"#,
        category, mime_type, size
    )
}

/// `json` followed by NUL padding up to `capacity`, the way a receipt buffer looks after a build
pub fn padded(json: &str, capacity: usize) -> Vec<u8> {
    let mut bytes = json.as_bytes().to_vec();
    bytes.resize(capacity.max(bytes.len()), 0);
    bytes
}
