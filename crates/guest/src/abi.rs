//! Typed wrappers over the host imports.
//!
//! Each wrapper does the whole dance for one call: allocate and write the arguments, reserve
//! the output buffer, call, then read back what the host reported writing. None of them fail
//! loudly. Lookups come back as `None`, identity queries fall back to zero values and the
//! output appending calls return [`OUTPUT_FAILED`].

use crate::config::ADDRESS_CAPACITY;
use crate::config::BASE58_CAPACITY;
use crate::config::CHAIN_ID_CAPACITY;
use crate::config::CLAIM_ID_CAPACITY;
use crate::config::DEFAULT_LOOKUP_CAPACITY;
use crate::config::HASH_CAPACITY;
use crate::config::OUTPUT_FAILED;
use crate::config::VERSION_CAPACITY;
use crate::memory;
use crate::sys;
use crate::try_or;
use wes_abi_common::draft::batch_outputs_json;
use wes_abi_common::draft::BatchItem;
use wes_abi_common::hex::bytes_to_hex;
use wes_abi_common::records::OutPoint;
use wes_abi_common::records::Resource;
use wes_abi_common::records::StateResult;
use wes_abi_common::records::Utxo;
use wes_abi_common::AbiError;
use wes_abi_common::Address;
use wes_abi_common::Buffer;
use wes_abi_common::ErrorCode;
use wes_abi_common::GuestPtr;
use wes_abi_common::Hash;
use wes_abi_common::Len;
use wes_abi_common::ADDRESS_LEN;
use wes_abi_common::NULL_PTR;

/// Reserves `capacity` bytes, lets the host fill them and reads back the prefix it reports.
///
/// A reported length of 0 or one larger than the buffer is treated as absent.
fn host_fill(capacity: Len, fill: impl FnOnce(GuestPtr, Len) -> Len) -> Option<Vec<u8>> {
    let buffer = memory::reserve(capacity).ok()?;
    let written = fill(buffer.ptr(), buffer.len());
    if written == 0 || written > capacity {
        tracing::debug!(written, capacity, "host wrote nothing usable");
        return None;
    }
    Some(memory::read_buffer(&buffer.truncate(written)))
}

/// only a complete 32 byte hash counts
fn full_hash(fill: impl FnOnce(GuestPtr, Len) -> Len) -> Option<Hash> {
    let bytes = host_fill(HASH_CAPACITY, fill)?;
    Hash::try_from(bytes.as_slice()).ok()
}

/// left aligned into a zeroed address, the host may write fewer than 20 bytes
fn address_from_prefix(bytes: &[u8]) -> Address {
    let mut address = [0; ADDRESS_LEN];
    let n = bytes.len().min(ADDRESS_LEN);
    address[..n].copy_from_slice(&bytes[..n]);
    Address(address)
}

/// an optional utf-8 argument as (ptr, len), (0, 0) when absent, empty or not allocatable
fn optional_str(value: Option<&str>) -> (GuestPtr, Len) {
    match value {
        Some(s) if !s.is_empty() => match memory::write_str_buffer(s) {
            Ok(buffer) => (buffer.ptr(), buffer.len()),
            Err(_) => (NULL_PTR, 0),
        },
        _ => (NULL_PTR, 0),
    }
}

fn status(code: u32) -> Result<(), AbiError> {
    match ErrorCode::from_host(code) {
        ErrorCode::Success => Ok(()),
        code => Err(AbiError::Host(code)),
    }
}

fn host_fill_string(capacity: Len, fill: impl FnOnce(GuestPtr, Len) -> Len) -> Option<String> {
    let bytes = host_fill(capacity, fill)?;
    match String::from_utf8(bytes) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, "host wrote invalid utf-8");
            None
        }
    }
}

/// `(major << 16) | (minor << 8) | patch`
pub fn abi_version() -> u32 {
    unsafe { sys::get_abi_version() }
}

/// Major versions must match, minor and patch are ignored.
pub fn is_abi_compatible(expected: u32) -> bool {
    abi_version() >> 16 == expected >> 16
}

pub fn caller() -> Address {
    host_fill(ADDRESS_CAPACITY, |ptr, _| unsafe { sys::get_caller(ptr) })
        .map(|bytes| address_from_prefix(&bytes))
        .unwrap_or(Address::ZERO)
}

pub fn contract_address() -> Address {
    host_fill(ADDRESS_CAPACITY, |ptr, _| unsafe {
        sys::get_contract_address(ptr)
    })
    .map(|bytes| address_from_prefix(&bytes))
    .unwrap_or(Address::ZERO)
}

pub fn timestamp() -> u64 {
    unsafe { sys::get_timestamp() }
}

pub fn block_height() -> u64 {
    unsafe { sys::get_block_height() }
}

/// Hash of the block at `height`, only when the host wrote all 32 bytes.
pub fn block_hash(height: u64) -> Option<Hash> {
    full_hash(|ptr, _| unsafe { sys::get_block_hash(height, ptr) })
}

pub fn merkle_root(height: u64) -> Option<Hash> {
    full_hash(|ptr, _| unsafe { sys::get_merkle_root(height, ptr) })
}

pub fn state_root(height: u64) -> Option<Hash> {
    full_hash(|ptr, _| unsafe { sys::get_state_root(height, ptr) })
}

/// Miner of the block at `height`. A short address is left aligned into a zeroed one.
pub fn miner_address(height: u64) -> Option<Address> {
    let bytes = host_fill(ADDRESS_CAPACITY, |ptr, _| unsafe {
        sys::get_miner_address(height, ptr)
    })?;
    Some(address_from_prefix(&bytes))
}

/// Hash of the running transaction, zero when the host does not provide one.
pub fn tx_hash() -> Hash {
    host_fill(HASH_CAPACITY, |ptr, _| unsafe { sys::get_tx_hash(ptr) })
        .and_then(|bytes| Hash::try_from(bytes.as_slice()).ok())
        .unwrap_or(Hash::ZERO)
}

pub fn tx_index() -> u32 {
    unsafe { sys::get_tx_index() }
}

pub fn chain_id() -> Option<Vec<u8>> {
    host_fill(CHAIN_ID_CAPACITY, |ptr, _| unsafe { sys::get_chain_id(ptr) })
}

fn send(bytes: &[u8], call: impl FnOnce(GuestPtr, Len) -> u32) -> Result<(), AbiError> {
    let buffer = memory::write_buffer(bytes)?;
    status(call(buffer.ptr(), buffer.len()))
}

pub fn set_return_data(data: &[u8]) -> Result<(), AbiError> {
    send(data, |ptr, len| unsafe { sys::set_return_data(ptr, len) })
}

/// `event` is expected to be a JSON object, the host does not check.
pub fn emit_event(event: &str) -> Result<(), AbiError> {
    send(event.as_bytes(), |ptr, len| unsafe { sys::emit_event(ptr, len) })
}

pub fn log_debug(message: &str) -> Result<(), AbiError> {
    send(message.as_bytes(), |ptr, len| unsafe {
        sys::log_debug(ptr, len)
    })
}

/// Raw parameters the contract was deployed with, `None` when there are none or they do not
/// fit in `max_len` bytes.
pub fn init_params(max_len: Len) -> Option<Vec<u8>> {
    host_fill(max_len, |ptr, len| unsafe {
        sys::get_contract_init_params(ptr, len)
    })
}

/// Parameters of the current call. The host only exposes them through the init params import.
pub fn contract_params(max_len: Len) -> Option<Vec<u8>> {
    init_params(max_len)
}

pub fn state_get(key: &str) -> Option<Vec<u8>> {
    let key = memory::write_str_buffer(key).ok()?;
    host_fill(DEFAULT_LOOKUP_CAPACITY, |ptr, len| unsafe {
        sys::state_get(key.ptr(), key.len(), ptr, len)
    })
}

/// Latest confirmed value and version of `state_id`.
///
/// The host reports success but not the value length, so `value` spans the whole lookup
/// buffer with the host's bytes at the front.
pub fn state_get_from_chain(state_id: &str) -> Option<StateResult> {
    let state_id = memory::write_str_buffer(state_id).ok()?;
    let value = memory::reserve(DEFAULT_LOOKUP_CAPACITY).ok()?;
    let version = memory::reserve(VERSION_CAPACITY).ok()?;
    let code = unsafe {
        sys::state_get_from_chain(
            state_id.ptr(),
            state_id.len(),
            value.ptr(),
            value.len(),
            version.ptr(),
        )
    };
    if code != 0 {
        tracing::debug!(code, "no confirmed state");
        return None;
    }
    Some(StateResult {
        value: memory::read_buffer(&value),
        version: memory::read_u64_le(version.ptr()),
    })
}

pub fn state_version(state_id: &str) -> u64 {
    let state_id = try_or!(memory::write_str_buffer(state_id), 0);
    unsafe { sys::get_state_version(state_id.ptr(), state_id.len()) }
}

fn write_hash(hash: &Hash) -> Result<Buffer, AbiError> {
    memory::write_buffer(hash.as_bytes())
}

pub fn utxo_lookup(out_point: &OutPoint) -> Option<Utxo> {
    let tx_id = write_hash(&out_point.tx_hash).ok()?;
    let json = host_fill_string(DEFAULT_LOOKUP_CAPACITY, |ptr, len| unsafe {
        sys::utxo_lookup_json(tx_id.ptr(), tx_id.len(), out_point.index, ptr, len)
    })?;
    let mut utxo = Utxo::from_lookup_json(*out_point, &json);
    utxo.output.data = json.into_bytes();
    Some(utxo)
}

pub fn utxo_exists(out_point: &OutPoint) -> bool {
    let tx_id = try_or!(write_hash(&out_point.tx_hash), false);
    unsafe { sys::utxo_exists(tx_id.ptr(), tx_id.len(), out_point.index) == 1 }
}

pub fn resource_lookup(content_hash: &Hash) -> Option<Resource> {
    let hash = write_hash(content_hash).ok()?;
    let json = host_fill_string(DEFAULT_LOOKUP_CAPACITY, |ptr, len| unsafe {
        sys::resource_lookup_json(hash.ptr(), hash.len(), ptr, len)
    })?;
    Some(Resource::from_lookup_json(*content_hash, &json))
}

pub fn resource_exists(content_hash: &Hash) -> bool {
    let hash = try_or!(write_hash(content_hash), false);
    unsafe { sys::resource_exists(hash.ptr(), hash.len()) == 1 }
}

/// Spendable balance of `address` in `token_id`, the native token when `None`.
pub fn query_utxo_balance(address: &Address, token_id: Option<&str>) -> u64 {
    let address = try_or!(memory::write_buffer(address.as_bytes()), 0);
    let (token_ptr, token_len) = optional_str(token_id);
    unsafe { sys::query_utxo_balance(address.ptr(), token_ptr, token_len) }
}

/// Creates a plain asset output paying `amount` to `recipient`, returning its index.
pub fn create_utxo_output(recipient: &Address, amount: u64, token_id: Option<&str>) -> u32 {
    let recipient = try_or!(memory::write_buffer(recipient.as_bytes()), OUTPUT_FAILED);
    let (token_ptr, token_len) = optional_str(token_id);
    unsafe { sys::create_utxo_output(recipient.ptr(), amount, token_ptr, token_len) }
}

/// Like [`create_utxo_output`] with optional locking conditions (JSON) attached.
pub fn create_asset_output_with_lock(
    recipient: &Address,
    amount: u64,
    token_id: Option<&str>,
    locking_conditions: Option<&str>,
) -> u32 {
    let recipient = try_or!(memory::write_buffer(recipient.as_bytes()), OUTPUT_FAILED);
    let (token_ptr, token_len) = optional_str(token_id);
    let (locking_ptr, locking_len) = optional_str(locking_conditions);
    unsafe {
        sys::create_asset_output_with_lock(
            recipient.ptr(),
            recipient.len(),
            amount,
            token_ptr,
            token_len,
            locking_ptr,
            locking_len,
        )
    }
}

/// Appends a state output to the pending transaction, returning its index.
///
/// Optional arguments that cannot be allocated are sent as absent rather than failing the
/// whole call.
pub fn append_state_output(
    state_id: &[u8],
    version: u64,
    exec_hash: &Hash,
    public_inputs: Option<&[u8]>,
    parent_hash: Option<&Hash>,
) -> u32 {
    let state_id = try_or!(memory::write_buffer(state_id), OUTPUT_FAILED);
    let exec_hash = try_or!(write_hash(exec_hash), OUTPUT_FAILED);
    let public_inputs = match public_inputs {
        Some(inputs) if !inputs.is_empty() => {
            memory::write_buffer(inputs).unwrap_or(Buffer::EMPTY)
        }
        _ => Buffer::EMPTY,
    };
    let parent_hash = parent_hash
        .and_then(|hash| write_hash(hash).ok())
        .unwrap_or(Buffer::EMPTY);
    unsafe {
        sys::append_state_output(
            state_id.ptr(),
            state_id.len(),
            version,
            exec_hash.ptr(),
            public_inputs.ptr(),
            public_inputs.len(),
            parent_hash.ptr(),
        )
    }
}

/// Appends a resource output owned by `owner`, returning its index.
pub fn append_resource_output(
    resource: &[u8],
    owner: &Address,
    locking_conditions: Option<&str>,
) -> u32 {
    let resource = try_or!(memory::write_buffer(resource), OUTPUT_FAILED);
    let owner = try_or!(memory::write_buffer(owner.as_bytes()), OUTPUT_FAILED);
    let (locking_ptr, locking_len) = optional_str(locking_conditions);
    unsafe {
        sys::append_resource_output(
            resource.ptr(),
            resource.len(),
            owner.ptr(),
            owner.len(),
            locking_ptr,
            locking_len,
        )
    }
}

/// Creates one asset output per item, returning how many the host created.
pub fn batch_create_outputs(items: &[BatchItem]) -> u32 {
    if items.is_empty() {
        return OUTPUT_FAILED;
    }
    let batch = try_or!(
        memory::write_str_buffer(&batch_outputs_json(items)),
        OUTPUT_FAILED
    );
    unsafe { sys::batch_create_outputs(batch.ptr(), batch.len()) }
}

pub fn address_to_base58(address: &Address) -> Option<String> {
    let address = memory::write_buffer(address.as_bytes()).ok()?;
    let bytes = host_fill(BASE58_CAPACITY, |ptr, len| unsafe {
        sys::address_bytes_to_base58(address.ptr(), ptr, len)
    })?;
    String::from_utf8(bytes).ok()
}

pub fn address_from_base58(encoded: &str) -> Option<Address> {
    let encoded = memory::write_str_buffer(encoded).ok()?;
    let bytes = host_fill(ADDRESS_CAPACITY, |ptr, _| unsafe {
        sys::address_base58_to_bytes(encoded.ptr(), encoded.len(), ptr)
    })?;
    Some(address_from_prefix(&bytes))
}

/// Base58 when the host can encode it, lowercase hex otherwise.
pub fn address_to_string(address: &Address) -> String {
    address_to_base58(address).unwrap_or_else(|| bytes_to_hex(address.as_bytes()))
}

/// Declares an expected external state. `claim` is JSON, the result is the host's claim id.
pub fn declare_external_state(claim: &str) -> Option<String> {
    let claim = memory::write_str_buffer(claim).ok()?;
    host_fill_string(CLAIM_ID_CAPACITY, |ptr, len| unsafe {
        sys::host_declare_external_state(claim.ptr(), claim.len(), ptr, len)
    })
}

/// Attaches `evidence` (JSON) to a declared claim, true when the host accepted it.
pub fn provide_evidence(claim_id: &str, evidence: &str) -> bool {
    let claim_id = try_or!(memory::write_str_buffer(claim_id), false);
    let evidence = try_or!(memory::write_str_buffer(evidence), false);
    unsafe {
        sys::host_provide_evidence(claim_id.ptr(), claim_id.len(), evidence.ptr(), evidence.len())
            == 1
    }
}

/// Current controlled state for a declared claim as JSON.
pub fn query_controlled_state(claim_id: &str) -> Option<String> {
    let claim_id = memory::write_str_buffer(claim_id).ok()?;
    host_fill_string(DEFAULT_LOOKUP_CAPACITY, |ptr, len| unsafe {
        sys::host_query_controlled_state(claim_id.ptr(), claim_id.len(), ptr, len)
    })
}
