use crate::abi;
use serde::{Deserialize, Serialize};
use wes_abi_common::Address;

/// What the host says about the current call, read once at entry.
///
/// Contract code passes this down explicitly instead of re-querying the host or keeping it in
/// statics, so nothing leaks from one invocation into the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub caller: Address,
    pub contract_address: Address,
    pub block_height: u64,
    pub timestamp: u64,
}

impl Invocation {
    pub fn load() -> Self {
        let invocation = Self {
            caller: abi::caller(),
            contract_address: abi::contract_address(),
            block_height: abi::block_height(),
            timestamp: abi::timestamp(),
        };
        tracing::trace!(?invocation, "invocation loaded");
        invocation
    }

    pub fn is_self_call(&self) -> bool {
        self.caller == self.contract_address
    }
}
