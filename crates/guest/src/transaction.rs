//! Accumulates a transaction draft and hands it to the host to build.
//!
//! The builder is single use. Once [`TransactionBuilder::finalize`] has run, every further
//! mutation is ignored and a second finalize reports `InvalidState`.

use crate::config::RECEIPT_CAPACITY;
use crate::memory;
use crate::sys;
use wes_abi_common::draft::Draft;
use wes_abi_common::draft::IntentDraft;
use wes_abi_common::draft::OutputDraft;
use wes_abi_common::draft::SignMode;
use wes_abi_common::receipt::Receipt;
use wes_abi_common::records::TransactionResult;
use wes_abi_common::AbiError;
use wes_abi_common::Address;
use wes_abi_common::Amount;
use wes_abi_common::ErrorCode;
use wes_abi_common::Hash;

#[derive(Debug, Default)]
pub struct TransactionBuilder {
    draft: Draft,
    finalized: bool,
}

impl TransactionBuilder {
    pub fn begin() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn push_output(&mut self, output: OutputDraft) -> &mut Self {
        if !self.finalized {
            self.draft.outputs.push(output);
        }
        self
    }

    fn push_intent(&mut self, intent: IntentDraft) -> &mut Self {
        if !self.finalized {
            self.draft.intents.push(intent);
        }
        self
    }

    /// `token_id` of `None` or `""` is the native token.
    pub fn add_asset_output(
        &mut self,
        owner: Address,
        amount: Amount,
        token_id: Option<&str>,
    ) -> &mut Self {
        self.push_output(OutputDraft::Asset {
            owner,
            amount,
            token_id: token_id.map(str::to_string),
        })
    }

    pub fn add_state_output(
        &mut self,
        state_id: &[u8],
        version: u64,
        exec_hash: Hash,
    ) -> &mut Self {
        self.push_output(OutputDraft::State {
            state_id: state_id.to_vec(),
            version,
            exec_hash,
        })
    }

    pub fn add_resource_output(&mut self, resource: &[u8], owner: Address) -> &mut Self {
        self.push_output(OutputDraft::Resource {
            resource: resource.to_vec(),
            owner,
        })
    }

    pub fn transfer_intent(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        token_id: Option<&str>,
    ) -> &mut Self {
        self.push_intent(IntentDraft::Transfer {
            from,
            to,
            amount,
            token_id: token_id.map(str::to_string),
        })
    }

    /// alias of [`Self::transfer_intent`]
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        token_id: Option<&str>,
    ) -> &mut Self {
        self.transfer_intent(from, to, amount, token_id)
    }

    pub fn stake_intent(
        &mut self,
        staker: Address,
        amount: Amount,
        validator: Address,
    ) -> &mut Self {
        self.push_intent(IntentDraft::Stake {
            staker,
            amount,
            validator,
        })
    }

    pub fn set_sign_mode(&mut self, sign_mode: SignMode) -> &mut Self {
        if !self.finalized {
            self.draft.sign_mode = sign_mode;
        }
        self
    }

    /// Sends the draft to the host and checks the receipt it writes back.
    pub fn finalize(&mut self) -> TransactionResult {
        if self.finalized {
            return TransactionResult::failed(ErrorCode::InvalidState);
        }
        self.finalized = true;

        match build(&self.draft) {
            Ok(receipt) => {
                tracing::debug!(len = receipt.json.len(), "transaction built");
                TransactionResult::ok()
            }
            Err(e) => {
                tracing::warn!(error = %e, "transaction build failed");
                TransactionResult::from(e)
            }
        }
    }
}

/// Marshals `draft`, calls `host_build_transaction` and validates the receipt.
///
/// Any marshaling failure and any unusable receipt surface as ExecutionFailed. A non zero
/// host status is passed through as its own code.
pub fn build(draft: &Draft) -> Result<Receipt, AbiError> {
    let execution_failed = |_: AbiError| AbiError::Host(ErrorCode::ExecutionFailed);
    let draft = memory::write_str_buffer(&draft.to_json()).map_err(execution_failed)?;
    let receipt = memory::reserve(RECEIPT_CAPACITY).map_err(execution_failed)?;

    let code = unsafe {
        sys::host_build_transaction(draft.ptr(), draft.len(), receipt.ptr(), receipt.len())
    };
    match ErrorCode::from_host(code) {
        ErrorCode::Success => Receipt::parse(&memory::read_buffer(&receipt)),
        code => Err(AbiError::Host(code)),
    }
}
