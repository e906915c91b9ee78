//! Outbound transaction drafts.
//!
//! A draft is built by plain string concatenation against a fixed schema:
//!
//! ```text
//! {"sign_mode":"...","outputs":[...],"intents":[...]}
//! ```
//!
//! | value | encoding |
//! |---|---|
//! | address | lowercase hex |
//! | token id | hex of its utf-8 bytes, `""` when empty |
//! | state id, resource bytes, exec hash | base64 |
//! | amount | decimal inside a JSON string |
//! | state version | bare JSON number |
//!
//! Amounts are strings so that 64 bit values survive hosts that read JSON numbers as doubles.

use crate::base64;
use crate::hex;
use crate::types::Address;
use crate::types::Amount;
use crate::types::Hash;
use serde::{Deserialize, Serialize};

/// Escapes `"`, `\`, newline, carriage return and tab.
///
/// Every other byte, including other control characters, passes through untouched. That is
/// enough for the identifiers, urls and methods embedded by this crate but is NOT a full JSON
/// string escape; arbitrary user text needs more than this.
pub fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignMode {
    #[default]
    DeferSign,
    Delegated,
    Threshold,
    Paymaster,
}

impl SignMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeferSign => "defer_sign",
            Self::Delegated => "delegated",
            Self::Threshold => "threshold",
            Self::Paymaster => "paymaster",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputDraft {
    Asset {
        owner: Address,
        amount: Amount,
        token_id: Option<String>,
    },
    State {
        #[serde(with = "serde_bytes")]
        state_id: Vec<u8>,
        version: u64,
        exec_hash: Hash,
    },
    Resource {
        #[serde(with = "serde_bytes")]
        resource: Vec<u8>,
        owner: Address,
    },
}

impl OutputDraft {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Asset { .. } => "asset",
            Self::State { .. } => "state",
            Self::Resource { .. } => "resource",
        }
    }

    fn to_json(&self) -> String {
        let fields = match self {
            Self::Asset {
                owner,
                amount,
                token_id,
            } => format!(
                ",\"owner\":\"{}\",\"amount\":\"{}\",\"token_id\":\"{}\",\"metadata\":{{}}",
                owner.to_hex(),
                amount,
                token_id_hex(token_id.as_deref()),
            ),
            Self::State {
                state_id,
                version,
                exec_hash,
            } => format!(
                ",\"state_id\":\"{}\",\"version\":{},\"exec_hash\":\"{}\"",
                base64::encode(state_id),
                version,
                base64::encode(exec_hash.as_bytes()),
            ),
            // the owner of a resource output travels through append_resource_output, not the draft
            Self::Resource { resource, .. } => {
                format!(",\"resource\":\"{}\"", base64::encode(resource))
            }
        };
        format!("{{\"type\":\"{}\"{}}}", self.type_name(), fields)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentDraft {
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
        token_id: Option<String>,
    },
    Stake {
        staker: Address,
        amount: Amount,
        validator: Address,
    },
}

impl IntentDraft {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Stake { .. } => "stake",
        }
    }

    fn to_json(&self) -> String {
        let params = match self {
            Self::Transfer {
                from,
                to,
                amount,
                token_id,
            } => format!(
                "\"from\":\"{}\",\"to\":\"{}\",\"token_id\":\"{}\",\"amount\":\"{}\"",
                from.to_hex(),
                to.to_hex(),
                token_id_hex(token_id.as_deref()),
                amount,
            ),
            Self::Stake {
                staker,
                amount,
                validator,
            } => format!(
                "\"staker\":\"{}\",\"amount\":\"{}\",\"validator\":\"{}\"",
                staker.to_hex(),
                amount,
                validator.to_hex(),
            ),
        };
        format!("{{\"type\":\"{}\",\"params\":{{{}}}}}", self.type_name(), params)
    }
}

fn token_id_hex(token_id: Option<&str>) -> String {
    match token_id {
        Some(id) if !id.is_empty() => hex::string_to_hex(id),
        _ => String::new(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub sign_mode: SignMode,
    pub outputs: Vec<OutputDraft>,
    pub intents: Vec<IntentDraft>,
}

impl Draft {
    pub fn to_json(&self) -> String {
        let outputs: Vec<String> = self.outputs.iter().map(OutputDraft::to_json).collect();
        let intents: Vec<String> = self.intents.iter().map(IntentDraft::to_json).collect();
        format!(
            "{{\"sign_mode\":\"{}\",\"outputs\":[{}],\"intents\":[{}]}}",
            escape_json(self.sign_mode.as_str()),
            outputs.join(","),
            intents.join(",")
        )
    }
}

/// One entry of a `batch_create_outputs` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub recipient: Address,
    pub amount: Amount,
    pub token_id: Option<String>,
}

/// `[{"recipient":"<b64>","amount":N,"token_id":"<b64>"|null,"locking_conditions":[]},...]`
///
/// Unlike drafts this payload uses base64 for the recipient and token id and a bare number for
/// the amount, which is the shape the host's batch endpoint reads.
pub fn batch_outputs_json(items: &[BatchItem]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let token_id = match item.token_id.as_deref() {
            Some(id) if !id.is_empty() => format!("\"{}\"", base64::encode(id.as_bytes())),
            _ => "null".to_string(),
        };
        out.push_str(&format!(
            "{{\"recipient\":\"{}\",\"amount\":{},\"token_id\":{},\"locking_conditions\":[]}}",
            base64::encode(item.recipient.as_bytes()),
            item.amount,
            token_id
        ));
    }
    out.push(']');
    out
}
