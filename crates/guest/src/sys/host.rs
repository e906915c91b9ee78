//! The WES host import function bindings.

use wes_abi_common::GuestPtr;
use wes_abi_common::Len;

#[link(wasm_import_module = "env")]
extern "C" {
    #[link_name = "get_abi_version"]
    pub fn get_abi_version() -> u32;

    #[link_name = "malloc"]
    pub fn malloc(size: Len) -> GuestPtr;

    #[link_name = "get_caller"]
    pub fn get_caller(addr_ptr: GuestPtr) -> Len;

    #[link_name = "get_contract_address"]
    pub fn get_contract_address(addr_ptr: GuestPtr) -> Len;

    #[link_name = "get_timestamp"]
    pub fn get_timestamp() -> u64;

    #[link_name = "get_block_height"]
    pub fn get_block_height() -> u64;

    #[link_name = "get_block_hash"]
    pub fn get_block_hash(height: u64, hash_ptr: GuestPtr) -> Len;

    #[link_name = "get_merkle_root"]
    pub fn get_merkle_root(height: u64, root_ptr: GuestPtr) -> Len;

    #[link_name = "get_state_root"]
    pub fn get_state_root(height: u64, root_ptr: GuestPtr) -> Len;

    #[link_name = "get_miner_address"]
    pub fn get_miner_address(height: u64, addr_ptr: GuestPtr) -> Len;

    #[link_name = "get_tx_hash"]
    pub fn get_tx_hash(hash_ptr: GuestPtr) -> Len;

    #[link_name = "get_tx_index"]
    pub fn get_tx_index() -> u32;

    #[link_name = "get_chain_id"]
    pub fn get_chain_id(chain_id_ptr: GuestPtr) -> Len;

    #[link_name = "set_return_data"]
    pub fn set_return_data(data_ptr: GuestPtr, data_len: Len) -> u32;

    #[link_name = "emit_event"]
    pub fn emit_event(event_ptr: GuestPtr, event_len: Len) -> u32;

    #[link_name = "log_debug"]
    pub fn log_debug(message_ptr: GuestPtr, message_len: Len) -> u32;

    #[link_name = "get_contract_init_params"]
    pub fn get_contract_init_params(buf_ptr: GuestPtr, buf_len: Len) -> Len;

    #[link_name = "state_get"]
    pub fn state_get(key_ptr: GuestPtr, key_len: Len, value_ptr: GuestPtr, value_len: Len)
        -> Len;

    #[link_name = "state_get_from_chain"]
    pub fn state_get_from_chain(
        state_id_ptr: GuestPtr,
        state_id_len: Len,
        value_ptr: GuestPtr,
        value_len: Len,
        version_ptr: GuestPtr,
    ) -> u32;

    #[link_name = "get_state_version"]
    pub fn get_state_version(state_id_ptr: GuestPtr, state_id_len: Len) -> u64;

    #[link_name = "utxo_lookup_json"]
    pub fn utxo_lookup_json(
        tx_id_ptr: GuestPtr,
        tx_id_len: Len,
        index: u32,
        output_ptr: GuestPtr,
        output_size: Len,
    ) -> Len;

    #[link_name = "utxo_exists"]
    pub fn utxo_exists(tx_id_ptr: GuestPtr, tx_id_len: Len, index: u32) -> u32;

    #[link_name = "resource_lookup_json"]
    pub fn resource_lookup_json(
        content_hash_ptr: GuestPtr,
        content_hash_len: Len,
        resource_ptr: GuestPtr,
        resource_size: Len,
    ) -> Len;

    #[link_name = "resource_exists"]
    pub fn resource_exists(content_hash_ptr: GuestPtr, content_hash_len: Len) -> u32;

    #[link_name = "query_utxo_balance"]
    pub fn query_utxo_balance(
        address_ptr: GuestPtr,
        token_id_ptr: GuestPtr,
        token_id_len: Len,
    ) -> u64;

    #[link_name = "create_utxo_output"]
    pub fn create_utxo_output(
        recipient_ptr: GuestPtr,
        amount: u64,
        token_id_ptr: GuestPtr,
        token_id_len: Len,
    ) -> u32;

    #[link_name = "append_state_output"]
    pub fn append_state_output(
        state_id_ptr: GuestPtr,
        state_id_len: Len,
        state_version: u64,
        exec_hash_ptr: GuestPtr,
        public_inputs_ptr: GuestPtr,
        public_inputs_len: Len,
        parent_hash_ptr: GuestPtr,
    ) -> u32;

    #[link_name = "append_resource_output"]
    pub fn append_resource_output(
        resource_ptr: GuestPtr,
        resource_len: Len,
        owner_ptr: GuestPtr,
        owner_len: Len,
        locking_ptr: GuestPtr,
        locking_len: Len,
    ) -> u32;

    #[link_name = "create_asset_output_with_lock"]
    pub fn create_asset_output_with_lock(
        recipient_ptr: GuestPtr,
        recipient_len: Len,
        amount: u64,
        token_id_ptr: GuestPtr,
        token_id_len: Len,
        locking_ptr: GuestPtr,
        locking_len: Len,
    ) -> u32;

    #[link_name = "batch_create_outputs"]
    pub fn batch_create_outputs(batch_ptr: GuestPtr, batch_len: Len) -> u32;

    #[link_name = "host_build_transaction"]
    pub fn host_build_transaction(
        draft_ptr: GuestPtr,
        draft_len: Len,
        receipt_ptr: GuestPtr,
        receipt_size: Len,
    ) -> u32;

    #[link_name = "address_bytes_to_base58"]
    pub fn address_bytes_to_base58(addr_ptr: GuestPtr, result_ptr: GuestPtr, max_len: Len) -> Len;

    #[link_name = "address_base58_to_bytes"]
    pub fn address_base58_to_bytes(
        base58_ptr: GuestPtr,
        base58_len: Len,
        result_ptr: GuestPtr,
    ) -> Len;

    #[link_name = "host_declare_external_state"]
    pub fn host_declare_external_state(
        claim_ptr: GuestPtr,
        claim_len: Len,
        claim_id_ptr: GuestPtr,
        claim_id_size: Len,
    ) -> Len;

    #[link_name = "host_provide_evidence"]
    pub fn host_provide_evidence(
        claim_id_ptr: GuestPtr,
        claim_id_len: Len,
        evidence_ptr: GuestPtr,
        evidence_len: Len,
    ) -> u32;

    #[link_name = "host_query_controlled_state"]
    pub fn host_query_controlled_state(
        claim_id_ptr: GuestPtr,
        claim_id_len: Len,
        result_ptr: GuestPtr,
        result_size: Len,
    ) -> Len;
}

/// Copies `bytes` into linear memory at `ptr`.
///
/// # Safety
///
/// `ptr` must be the start of a region of at least `bytes.len()` bytes handed out by `malloc`.
pub unsafe fn write_memory(ptr: GuestPtr, bytes: &[u8]) {
    core::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr as usize as *mut u8, bytes.len());
}

/// Copies `len` bytes of linear memory starting at `ptr`.
///
/// # Safety
///
/// `ptr..ptr + len` must lie inside memory the host has written or `malloc` handed out.
pub unsafe fn read_memory(ptr: GuestPtr, len: Len) -> Vec<u8> {
    core::slice::from_raw_parts(ptr as usize as *const u8, len as usize).to_vec()
}
