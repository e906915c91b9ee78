//! A small token contract written against the guest bindings, driven end to end by the tests
//! below against the mock host.

use test_common::TransferRequest;
use wes_abi_common::hash::compute_hash;
use wes_abi_common::json::stringify_pairs;
use wes_abi_common::ErrorCode;
use wes_abi_guest::abi;
use wes_abi_guest::Invocation;
use wes_abi_guest::TransactionBuilder;

pub const PARAMS_CAPACITY: u32 = 1024;

/// Moves `amount` of a token from the caller to the requested recipient.
///
/// Returns the status code the host sees as the call's result.
pub fn transfer(invocation: &Invocation) -> u32 {
    let Some(params) = abi::init_params(PARAMS_CAPACITY) else {
        return ErrorCode::InvalidParams.to_host();
    };
    let Some(request) = std::str::from_utf8(&params)
        .ok()
        .and_then(TransferRequest::from_params_json)
    else {
        return ErrorCode::InvalidParams.to_host();
    };
    if request.amount == 0 {
        return ErrorCode::InvalidParams.to_host();
    }

    let token_id = request.token_id.as_deref();
    let balance = abi::query_utxo_balance(&invocation.caller, token_id);
    if balance < request.amount {
        if let Err(e) = abi::log_debug("transfer rejected: balance too low") {
            wes_abi_guest::tracing::debug!(error = %e, "host refused debug log");
        }
        return ErrorCode::InsufficientBalance.to_host();
    }

    let result = TransactionBuilder::begin()
        .transfer(invocation.caller, request.to, request.amount, token_id)
        .finalize();
    if !result.success {
        return result.code.to_host();
    }

    let amount = request.amount.to_string();
    let from = abi::address_to_string(&invocation.caller);
    let to = abi::address_to_string(&request.to);
    let event = stringify_pairs(&[
        ("name", "Transfer"),
        ("from", &from),
        ("to", &to),
        ("amount", &amount),
    ]);
    if abi::emit_event(&event).is_err() {
        return ErrorCode::ExecutionFailed.to_host();
    }
    match abi::set_return_data(&request.amount.to_le_bytes()) {
        Ok(()) => ErrorCode::Success.to_host(),
        Err(e) => e.code().to_host(),
    }
}

/// Records a vote as a versioned state output keyed by voter and proposal.
pub fn vote(invocation: &Invocation, proposal: &str, choice: &str) -> u32 {
    let state_id = format!("vote:{}:{}", invocation.caller.to_hex(), proposal);
    let version = abi::state_version(&state_id) + 1;
    let exec_hash = compute_hash(format!("{}={}", state_id, choice).as_bytes());

    TransactionBuilder::begin()
        .add_state_output(state_id.as_bytes(), version, exec_hash)
        .finalize()
        .code
        .to_host()
}

#[cfg(test)]
pub mod tests {
    use crate::transfer;
    use crate::vote;
    use test_common::*;
    use wes_abi_common::base64;
    use wes_abi_common::draft::SignMode;
    use wes_abi_common::hash::compute_hash;
    use wes_abi_common::json::find_json_field;
    use wes_abi_common::records::OutPoint;
    use wes_abi_common::records::OutputType;
    use wes_abi_common::records::ResourceCategory;
    use wes_abi_common::AbiError;
    use wes_abi_common::Address;
    use wes_abi_common::ErrorCode;
    use wes_abi_common::Hash;
    use wes_abi_guest::abi;
    use wes_abi_guest::sys;
    use wes_abi_guest::Invocation;
    use wes_abi_guest::TransactionBuilder;

    #[ctor::ctor]
    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn host_with_alice(balance: u64, request: &TransferRequest) -> Invocation {
        sys::reset();
        sys::with_host(|host| {
            host.caller = ALICE.0.to_vec();
            host.contract_address = vec![0xcc; 20];
            host.block_height = 100;
            host.timestamp = 1_700_000_000;
            host.init_params = request.to_params_json().into_bytes();
            let token = request.token_id.clone().unwrap_or_default().into_bytes();
            host.balances.insert((ALICE.0.to_vec(), token), balance);
            host.base58.insert(ALICE.0.to_vec(), "AliceBase58".into());
        });
        Invocation::load()
    }

    #[test]
    fn transfer_flow_test() {
        let request = TransferRequest::new(BOB, 250, Some("gold"));
        let invocation = host_with_alice(1000, &request);
        assert_eq!(ErrorCode::Success.to_host(), transfer(&invocation));

        sys::with_host(|host| {
            assert_eq!(1, host.drafts.len());
            let draft: serde_json::Value = serde_json::from_str(&host.drafts[0]).unwrap();
            assert_eq!("defer_sign", draft["sign_mode"]);
            let params = &draft["intents"][0]["params"];
            assert_eq!(ALICE.to_hex(), params["from"]);
            assert_eq!(BOB.to_hex(), params["to"]);
            assert_eq!("250", params["amount"]);
            assert_eq!("676f6c64", params["token_id"]);

            let event = &host.events[0];
            assert_eq!("Transfer", find_json_field(event, "name"));
            assert_eq!("AliceBase58", find_json_field(event, "from"));
            // bob has no base58 form registered so the hex fallback is used
            assert_eq!(BOB.to_hex(), find_json_field(event, "to"));
            assert_eq!(Some(250_u64.to_le_bytes().to_vec()), host.return_data);
        });
    }

    #[test]
    fn transfer_rejects_insufficient_balance_test() {
        let request = TransferRequest::new(BOB, 5000, None);
        let invocation = host_with_alice(1000, &request);
        assert_eq!(ErrorCode::InsufficientBalance.to_host(), transfer(&invocation));
        sys::with_host(|host| {
            assert!(host.drafts.is_empty());
            assert!(host.events.is_empty());
            assert_eq!(vec!["transfer rejected: balance too low".to_string()], host.logs);
        });
    }

    #[test]
    fn refused_debug_log_keeps_rejection_code_test() {
        let request = TransferRequest::new(BOB, 5000, None);
        let invocation = host_with_alice(1000, &request);
        sys::with_host(|host| host.log_status = ErrorCode::PermissionDenied.to_host());
        assert_eq!(ErrorCode::InsufficientBalance.to_host(), transfer(&invocation));
        assert_eq!(
            Err(AbiError::Host(ErrorCode::PermissionDenied)),
            abi::log_debug("again")
        );
        sys::with_host(|host| assert!(host.drafts.is_empty()));
    }

    #[test]
    fn transfer_rejects_bad_params_test() {
        let request = TransferRequest::new(BOB, 0, None);
        let invocation = host_with_alice(1000, &request);
        assert_eq!(ErrorCode::InvalidParams.to_host(), transfer(&invocation));

        sys::with_host(|host| host.init_params = br#"{"to":"xyz","amount":"1"}"#.to_vec());
        assert_eq!(ErrorCode::InvalidParams.to_host(), transfer(&invocation));

        sys::with_host(|host| host.init_params.clear());
        assert_eq!(ErrorCode::InvalidParams.to_host(), transfer(&invocation));
    }

    #[test]
    fn transfer_reports_receipt_error_test() {
        let request = TransferRequest::new(BOB, 1, None);
        let invocation = host_with_alice(10, &request);
        sys::with_host(|host| host.receipt = br#"{"error":"nonce reused"}"#.to_vec());
        assert_eq!(ErrorCode::ExecutionFailed.to_host(), transfer(&invocation));
        sys::with_host(|host| {
            assert_eq!(1, host.drafts.len());
            assert!(host.events.is_empty());
        });
    }

    #[test]
    fn transfer_reports_host_status_test() {
        let request = TransferRequest::new(BOB, 1, None);
        let invocation = host_with_alice(10, &request);
        sys::with_host(|host| host.build_status = ErrorCode::Unauthorized.to_host());
        assert_eq!(ErrorCode::Unauthorized.to_host(), transfer(&invocation));
    }

    #[test]
    fn vote_versions_state_test() {
        sys::reset();
        sys::with_host(|host| host.caller = ALICE.0.to_vec());
        let invocation = Invocation::load();
        let state_id = format!("vote:{}:proposal_001", ALICE.to_hex());
        sys::with_host(|host| host.state_versions.insert(state_id.clone().into_bytes(), 4));

        assert_eq!(0, vote(&invocation, "proposal_001", "yes"));

        sys::with_host(|host| {
            let draft = &host.drafts[0];
            assert_eq!("5", find_json_field(draft, "version"));
            assert_eq!(
                base64::encode(state_id.as_bytes()),
                find_json_field(draft, "state_id")
            );
            let exec_hash = compute_hash(format!("{}=yes", state_id).as_bytes());
            assert_eq!(
                base64::encode(exec_hash.as_bytes()),
                find_json_field(draft, "exec_hash")
            );
        });
    }

    #[test]
    fn full_draft_shape_test() {
        sys::reset();
        let mut builder = TransactionBuilder::begin();
        builder
            .set_sign_mode(SignMode::Threshold)
            .add_asset_output(BOB, 10, None)
            .add_state_output(b"counter", 1, Hash([1; 32]))
            .add_resource_output(b"<svg/>", ALICE)
            .transfer_intent(ALICE, BOB, 10, None)
            .stake_intent(ALICE, 500, VALIDATOR);
        assert!(builder.finalize().success);

        sys::with_host(|host| {
            let draft: serde_json::Value = serde_json::from_str(&host.drafts[0]).unwrap();
            let outputs = draft["outputs"].as_array().unwrap();
            let types: Vec<_> = outputs.iter().map(|o| o["type"].clone()).collect();
            assert_eq!(vec!["asset", "state", "resource"], types);
            assert_eq!("", outputs[0]["token_id"]);
            assert!(outputs[0]["metadata"].as_object().unwrap().is_empty());
            assert_eq!(1, outputs[1]["version"]);
            assert_eq!(base64::encode(b"<svg/>"), outputs[2]["resource"]);
            let intents = draft["intents"].as_array().unwrap();
            assert_eq!("stake", intents[1]["type"]);
            assert_eq!(VALIDATOR.to_hex(), intents[1]["params"]["validator"]);
            assert_eq!("500", intents[1]["params"]["amount"]);
        });
    }

    #[test]
    fn padded_receipt_is_trimmed_test() {
        sys::reset();
        sys::with_host(|host| host.receipt = padded(r#"{"tx_hash":"ab"}  "#, 4096));
        assert!(TransactionBuilder::begin().finalize().success);
    }

    #[test]
    fn lookups_round_trip_through_host_json_test() {
        sys::reset();
        let out_point = OutPoint::new(Hash([2; 32]), 0);
        let content = Hash([3; 32]);
        sys::with_host(|host| {
            host.utxos.insert(
                (vec![2; 32], 0),
                asset_utxo_json(&BOB, 77, Some("silver")),
            );
            host.resources.insert(
                vec![3; 32],
                resource_json("STATIC", "image/png", 4096),
            );
        });

        let utxo = abi::utxo_lookup(&out_point).unwrap();
        assert_eq!(OutputType::Asset, utxo.output.output_type);
        assert_eq!(Some(BOB), utxo.output.recipient);
        assert_eq!(77, utxo.output.amount);
        assert_eq!(Some("silver".to_string()), utxo.output.token_id);

        let resource = abi::resource_lookup(&content).unwrap();
        assert_eq!(ResourceCategory::Static, resource.category);
        assert_eq!("image/png", resource.mime_type);
        assert_eq!(4096, resource.size);
    }

    #[test]
    fn oversized_lookup_is_absent_test() {
        sys::reset();
        let out_point = OutPoint::new(Hash([2; 32]), 0);
        let huge = format!(r#"{{"asset":{{"amount":"1"}},"pad":"{}"}}"#, "x".repeat(9000));
        sys::with_host(|host| host.utxos.insert((vec![2; 32], 0), huge));
        assert!(abi::utxo_exists(&out_point));
        assert_eq!(None, abi::utxo_lookup(&out_point));
    }

    #[test]
    fn params_round_trip_test() {
        let request = TransferRequest::new(Address([0x0a; 20]), u64::MAX, Some("gold"));
        assert_eq!(
            Some(request.clone()),
            TransferRequest::from_params_json(&request.to_params_json())
        );
        let native = TransferRequest::new(BOB, 1, None);
        assert_eq!(
            Some(native.clone()),
            TransferRequest::from_params_json(&native.to_params_json())
        );
    }

    #[test]
    fn hosts_are_isolated_per_thread_test() {
        let handles: Vec<_> = (0_u8..4)
            .map(|i| {
                std::thread::spawn(move || {
                    sys::reset();
                    sys::with_host(|host| host.caller = vec![i; 20]);
                    let invocation = Invocation::load();
                    TransactionBuilder::begin()
                        .add_asset_output(invocation.caller, i as u64, None)
                        .finalize();
                    sys::with_host(|host| host.drafts.clone())
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let drafts = handle.join().unwrap();
            assert_eq!(1, drafts.len());
            assert_eq!(
                Address([i as u8; 20]).to_hex(),
                find_json_field(&drafts[0], "owner")
            );
        }
    }
}
