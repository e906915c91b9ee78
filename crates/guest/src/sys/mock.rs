//! Mock host import function bindings.
//!
//! Each thread gets its own [`MockHost`] with a private linear memory, so tests running in
//! parallel never observe each other's arenas. Tests configure what the host will answer and
//! inspect what the guest sent through [`with_host`], and start from a clean host with [`reset`].
//!
//! Out of range memory access panics. On the real host that would trap the whole invocation.

use std::cell::RefCell;
use std::collections::HashMap;
use wes_abi_common::GuestPtr;
use wes_abi_common::Len;
use wes_abi_common::NULL_PTR;

/// first offset the mock allocator hands out, everything below it is never allocated
pub const ARENA_BASE: usize = 8;

pub const DEFAULT_ABI_VERSION: u32 = 0x0001_0000;

pub const DEFAULT_RECEIPT: &[u8] = br#"{"tx_hash":"mock","error":null}"#;

/// address and chain id buffers the host writes into without being told their size
const ADDRESS_BUFFER: Len = 20;
const HASH_BUFFER: Len = 32;
const CHAIN_ID_BUFFER: Len = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateOutputCall {
    pub state_id: Vec<u8>,
    pub version: u64,
    pub exec_hash: Vec<u8>,
    pub public_inputs: Vec<u8>,
    pub parent_hash: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceOutputCall {
    pub resource: Vec<u8>,
    pub owner: Vec<u8>,
    pub locking_conditions: String,
}

/// both asset output calls land here, `locking_conditions` is empty for a plain utxo output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetOutputCall {
    pub recipient: Vec<u8>,
    pub amount: u64,
    pub token_id: String,
    pub locking_conditions: String,
}

#[derive(Clone, Debug)]
pub struct MockHost {
    pub memory: Vec<u8>,
    /// every malloc returns the null offset
    pub fail_alloc: bool,
    /// successful allocations left before malloc starts returning the null offset
    pub alloc_budget: Option<usize>,

    pub abi_version: u32,
    pub caller: Vec<u8>,
    pub contract_address: Vec<u8>,
    pub timestamp: u64,
    pub block_height: u64,
    pub block_hashes: HashMap<u64, Vec<u8>>,
    pub merkle_roots: HashMap<u64, Vec<u8>>,
    pub state_roots: HashMap<u64, Vec<u8>>,
    pub miners: HashMap<u64, Vec<u8>>,
    pub tx_hash: Vec<u8>,
    pub tx_index: u32,
    pub chain_id: Vec<u8>,
    pub init_params: Vec<u8>,

    pub state: HashMap<Vec<u8>, Vec<u8>>,
    /// confirmed state by id: value and version
    pub chain_state: HashMap<Vec<u8>, (Vec<u8>, u64)>,
    pub state_versions: HashMap<Vec<u8>, u64>,
    /// utxo lookup json by (tx hash, output index)
    pub utxos: HashMap<(Vec<u8>, u32), String>,
    /// resource lookup json by content hash
    pub resources: HashMap<Vec<u8>, String>,
    /// balance by (address, token id), the native token has an empty id
    pub balances: HashMap<(Vec<u8>, Vec<u8>), u64>,
    pub base58: HashMap<Vec<u8>, String>,
    /// claim id handed back for each declared claim json
    pub claim_ids: HashMap<String, String>,
    /// controlled state json by claim id
    pub controlled_state: HashMap<String, String>,

    /// written into the receipt buffer by a successful build
    pub receipt: Vec<u8>,
    pub build_status: u32,
    /// overrides the index returned by the output appending calls
    pub append_status: Option<u32>,
    /// status returned by `log_debug`
    pub log_status: u32,

    pub return_data: Option<Vec<u8>>,
    pub events: Vec<String>,
    pub logs: Vec<String>,
    pub drafts: Vec<String>,
    pub state_outputs: Vec<StateOutputCall>,
    pub resource_outputs: Vec<ResourceOutputCall>,
    pub asset_outputs: Vec<AssetOutputCall>,
    /// (claim id, evidence) accepted by `host_provide_evidence`
    pub evidence: Vec<(String, String)>,
    pub batches: Vec<String>,
    pub output_count: u32,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            memory: vec![0; ARENA_BASE],
            fail_alloc: false,
            alloc_budget: None,
            abi_version: DEFAULT_ABI_VERSION,
            caller: vec![],
            contract_address: vec![],
            timestamp: 0,
            block_height: 0,
            block_hashes: HashMap::new(),
            merkle_roots: HashMap::new(),
            state_roots: HashMap::new(),
            miners: HashMap::new(),
            tx_hash: vec![],
            tx_index: 0,
            chain_id: vec![],
            init_params: vec![],
            state: HashMap::new(),
            chain_state: HashMap::new(),
            state_versions: HashMap::new(),
            utxos: HashMap::new(),
            resources: HashMap::new(),
            balances: HashMap::new(),
            base58: HashMap::new(),
            claim_ids: HashMap::new(),
            controlled_state: HashMap::new(),
            receipt: DEFAULT_RECEIPT.to_vec(),
            build_status: 0,
            append_status: None,
            log_status: 0,
            return_data: None,
            events: vec![],
            logs: vec![],
            drafts: vec![],
            state_outputs: vec![],
            resource_outputs: vec![],
            asset_outputs: vec![],
            evidence: vec![],
            batches: vec![],
            output_count: 0,
        }
    }
}

impl MockHost {
    fn alloc(&mut self, size: Len) -> GuestPtr {
        if self.fail_alloc {
            return NULL_PTR;
        }
        if let Some(budget) = self.alloc_budget.as_mut() {
            if *budget == 0 {
                return NULL_PTR;
            }
            *budget -= 1;
        }
        let Ok(ptr) = GuestPtr::try_from(self.memory.len()) else {
            return NULL_PTR;
        };
        self.memory.resize(self.memory.len() + size as usize, 0);
        ptr
    }

    pub fn read(&self, ptr: GuestPtr, len: Len) -> Vec<u8> {
        let start = ptr as usize;
        match self.memory.get(start..start + len as usize) {
            Some(bytes) => bytes.to_vec(),
            None => panic!("mock host read {}..+{} outside the arena", ptr, len),
        }
    }

    /// like `read` but a null offset or zero length is an absent argument
    fn read_arg(&self, ptr: GuestPtr, len: Len) -> Vec<u8> {
        if ptr == NULL_PTR || len == 0 {
            vec![]
        } else {
            self.read(ptr, len)
        }
    }

    fn read_str(&self, ptr: GuestPtr, len: Len) -> String {
        String::from_utf8_lossy(&self.read_arg(ptr, len)).into_owned()
    }

    pub fn write(&mut self, ptr: GuestPtr, bytes: &[u8]) {
        let start = ptr as usize;
        match self.memory.get_mut(start..start + bytes.len()) {
            Some(dst) => dst.copy_from_slice(bytes),
            None => panic!("mock host write {}..+{} outside the arena", ptr, bytes.len()),
        }
    }

    /// writes `bytes` into a caller buffer of `capacity` bytes, 0 when absent or too large
    fn fill(&mut self, ptr: GuestPtr, capacity: Len, bytes: &[u8]) -> Len {
        if bytes.is_empty() || bytes.len() > capacity as usize {
            return 0;
        }
        self.write(ptr, bytes);
        bytes.len() as Len
    }

    fn next_output(&mut self) -> u32 {
        if let Some(status) = self.append_status {
            return status;
        }
        let index = self.output_count;
        self.output_count += 1;
        index
    }
}

thread_local! {
    static HOST: RefCell<MockHost> = RefCell::new(MockHost::default());
}

/// Runs `f` against this thread's mock host.
pub fn with_host<R>(f: impl FnOnce(&mut MockHost) -> R) -> R {
    HOST.with(|host| f(&mut host.borrow_mut()))
}

/// Replaces this thread's mock host with a fresh default one.
pub fn reset() {
    with_host(|host| *host = MockHost::default());
}

pub unsafe fn write_memory(ptr: GuestPtr, bytes: &[u8]) {
    with_host(|host| host.write(ptr, bytes));
}

pub unsafe fn read_memory(ptr: GuestPtr, len: Len) -> Vec<u8> {
    with_host(|host| host.read(ptr, len))
}

pub unsafe fn get_abi_version() -> u32 {
    with_host(|host| host.abi_version)
}

pub unsafe fn malloc(size: Len) -> GuestPtr {
    with_host(|host| host.alloc(size))
}

pub unsafe fn get_caller(addr_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let caller = host.caller.clone();
        host.fill(addr_ptr, ADDRESS_BUFFER, &caller)
    })
}

pub unsafe fn get_contract_address(addr_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let address = host.contract_address.clone();
        host.fill(addr_ptr, ADDRESS_BUFFER, &address)
    })
}

pub unsafe fn get_timestamp() -> u64 {
    with_host(|host| host.timestamp)
}

pub unsafe fn get_block_height() -> u64 {
    with_host(|host| host.block_height)
}

pub unsafe fn get_block_hash(height: u64, hash_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let hash = host.block_hashes.get(&height).cloned().unwrap_or_default();
        host.fill(hash_ptr, HASH_BUFFER, &hash)
    })
}

pub unsafe fn get_merkle_root(height: u64, root_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let root = host.merkle_roots.get(&height).cloned().unwrap_or_default();
        host.fill(root_ptr, HASH_BUFFER, &root)
    })
}

pub unsafe fn get_state_root(height: u64, root_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let root = host.state_roots.get(&height).cloned().unwrap_or_default();
        host.fill(root_ptr, HASH_BUFFER, &root)
    })
}

pub unsafe fn get_miner_address(height: u64, addr_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let miner = host.miners.get(&height).cloned().unwrap_or_default();
        host.fill(addr_ptr, ADDRESS_BUFFER, &miner)
    })
}

pub unsafe fn get_tx_hash(hash_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let hash = host.tx_hash.clone();
        host.fill(hash_ptr, HASH_BUFFER, &hash)
    })
}

pub unsafe fn get_tx_index() -> u32 {
    with_host(|host| host.tx_index)
}

pub unsafe fn get_chain_id(chain_id_ptr: GuestPtr) -> Len {
    with_host(|host| {
        let chain_id = host.chain_id.clone();
        host.fill(chain_id_ptr, CHAIN_ID_BUFFER, &chain_id)
    })
}

pub unsafe fn set_return_data(data_ptr: GuestPtr, data_len: Len) -> u32 {
    with_host(|host| {
        host.return_data = Some(host.read_arg(data_ptr, data_len));
        0
    })
}

pub unsafe fn emit_event(event_ptr: GuestPtr, event_len: Len) -> u32 {
    with_host(|host| {
        let event = host.read_str(event_ptr, event_len);
        host.events.push(event);
        0
    })
}

pub unsafe fn log_debug(message_ptr: GuestPtr, message_len: Len) -> u32 {
    with_host(|host| {
        let message = host.read_str(message_ptr, message_len);
        host.logs.push(message);
        host.log_status
    })
}

pub unsafe fn get_contract_init_params(buf_ptr: GuestPtr, buf_len: Len) -> Len {
    with_host(|host| {
        let params = host.init_params.clone();
        host.fill(buf_ptr, buf_len, &params)
    })
}

pub unsafe fn state_get(
    key_ptr: GuestPtr,
    key_len: Len,
    value_ptr: GuestPtr,
    value_len: Len,
) -> Len {
    with_host(|host| {
        let key = host.read_arg(key_ptr, key_len);
        let value = host.state.get(&key).cloned().unwrap_or_default();
        host.fill(value_ptr, value_len, &value)
    })
}

/// 0 on success, 1 when the state is unknown or does not fit
pub unsafe fn state_get_from_chain(
    state_id_ptr: GuestPtr,
    state_id_len: Len,
    value_ptr: GuestPtr,
    value_len: Len,
    version_ptr: GuestPtr,
) -> u32 {
    with_host(|host| {
        let state_id = host.read_arg(state_id_ptr, state_id_len);
        let Some((value, version)) = host.chain_state.get(&state_id).cloned() else {
            return 1;
        };
        if host.fill(value_ptr, value_len, &value) == 0 {
            return 1;
        }
        host.write(version_ptr, &version.to_le_bytes());
        0
    })
}

pub unsafe fn get_state_version(state_id_ptr: GuestPtr, state_id_len: Len) -> u64 {
    with_host(|host| {
        let state_id = host.read_arg(state_id_ptr, state_id_len);
        host.state_versions.get(&state_id).copied().unwrap_or(0)
    })
}

pub unsafe fn utxo_lookup_json(
    tx_id_ptr: GuestPtr,
    tx_id_len: Len,
    index: u32,
    output_ptr: GuestPtr,
    output_size: Len,
) -> Len {
    with_host(|host| {
        let tx_id = host.read_arg(tx_id_ptr, tx_id_len);
        let json = host.utxos.get(&(tx_id, index)).cloned().unwrap_or_default();
        host.fill(output_ptr, output_size, json.as_bytes())
    })
}

pub unsafe fn utxo_exists(tx_id_ptr: GuestPtr, tx_id_len: Len, index: u32) -> u32 {
    with_host(|host| {
        let tx_id = host.read_arg(tx_id_ptr, tx_id_len);
        host.utxos.contains_key(&(tx_id, index)) as u32
    })
}

pub unsafe fn resource_lookup_json(
    content_hash_ptr: GuestPtr,
    content_hash_len: Len,
    resource_ptr: GuestPtr,
    resource_size: Len,
) -> Len {
    with_host(|host| {
        let hash = host.read_arg(content_hash_ptr, content_hash_len);
        let json = host.resources.get(&hash).cloned().unwrap_or_default();
        host.fill(resource_ptr, resource_size, json.as_bytes())
    })
}

pub unsafe fn resource_exists(content_hash_ptr: GuestPtr, content_hash_len: Len) -> u32 {
    with_host(|host| {
        let hash = host.read_arg(content_hash_ptr, content_hash_len);
        host.resources.contains_key(&hash) as u32
    })
}

pub unsafe fn query_utxo_balance(
    address_ptr: GuestPtr,
    token_id_ptr: GuestPtr,
    token_id_len: Len,
) -> u64 {
    with_host(|host| {
        let address = host.read_arg(address_ptr, ADDRESS_BUFFER);
        let token_id = host.read_arg(token_id_ptr, token_id_len);
        host.balances.get(&(address, token_id)).copied().unwrap_or(0)
    })
}

pub unsafe fn create_utxo_output(
    recipient_ptr: GuestPtr,
    amount: u64,
    token_id_ptr: GuestPtr,
    token_id_len: Len,
) -> u32 {
    with_host(|host| {
        let call = AssetOutputCall {
            recipient: host.read_arg(recipient_ptr, ADDRESS_BUFFER),
            amount,
            token_id: host.read_str(token_id_ptr, token_id_len),
            locking_conditions: String::new(),
        };
        host.asset_outputs.push(call);
        host.next_output()
    })
}

pub unsafe fn append_state_output(
    state_id_ptr: GuestPtr,
    state_id_len: Len,
    state_version: u64,
    exec_hash_ptr: GuestPtr,
    public_inputs_ptr: GuestPtr,
    public_inputs_len: Len,
    parent_hash_ptr: GuestPtr,
) -> u32 {
    with_host(|host| {
        let call = StateOutputCall {
            state_id: host.read_arg(state_id_ptr, state_id_len),
            version: state_version,
            exec_hash: host.read_arg(exec_hash_ptr, HASH_BUFFER),
            public_inputs: host.read_arg(public_inputs_ptr, public_inputs_len),
            parent_hash: match parent_hash_ptr {
                NULL_PTR => None,
                ptr => Some(host.read(ptr, HASH_BUFFER)),
            },
        };
        host.state_outputs.push(call);
        host.next_output()
    })
}

pub unsafe fn append_resource_output(
    resource_ptr: GuestPtr,
    resource_len: Len,
    owner_ptr: GuestPtr,
    owner_len: Len,
    locking_ptr: GuestPtr,
    locking_len: Len,
) -> u32 {
    with_host(|host| {
        let call = ResourceOutputCall {
            resource: host.read_arg(resource_ptr, resource_len),
            owner: host.read_arg(owner_ptr, owner_len),
            locking_conditions: host.read_str(locking_ptr, locking_len),
        };
        host.resource_outputs.push(call);
        host.next_output()
    })
}

pub unsafe fn create_asset_output_with_lock(
    recipient_ptr: GuestPtr,
    recipient_len: Len,
    amount: u64,
    token_id_ptr: GuestPtr,
    token_id_len: Len,
    locking_ptr: GuestPtr,
    locking_len: Len,
) -> u32 {
    with_host(|host| {
        let call = AssetOutputCall {
            recipient: host.read_arg(recipient_ptr, recipient_len),
            amount,
            token_id: host.read_str(token_id_ptr, token_id_len),
            locking_conditions: host.read_str(locking_ptr, locking_len),
        };
        host.asset_outputs.push(call);
        host.next_output()
    })
}

/// number of outputs in the batch
pub unsafe fn batch_create_outputs(batch_ptr: GuestPtr, batch_len: Len) -> u32 {
    with_host(|host| {
        let batch = host.read_str(batch_ptr, batch_len);
        let created = batch.matches("\"recipient\":").count() as u32;
        host.batches.push(batch);
        if let Some(status) = host.append_status {
            return status;
        }
        host.output_count += created;
        created
    })
}

pub unsafe fn host_build_transaction(
    draft_ptr: GuestPtr,
    draft_len: Len,
    receipt_ptr: GuestPtr,
    receipt_size: Len,
) -> u32 {
    with_host(|host| {
        let draft = host.read_str(draft_ptr, draft_len);
        host.drafts.push(draft);
        if host.build_status != 0 {
            return host.build_status;
        }
        let mut receipt = host.receipt.clone();
        receipt.truncate(receipt_size as usize);
        host.write(receipt_ptr, &receipt);
        0
    })
}

pub unsafe fn address_bytes_to_base58(
    addr_ptr: GuestPtr,
    result_ptr: GuestPtr,
    max_len: Len,
) -> Len {
    with_host(|host| {
        let address = host.read_arg(addr_ptr, ADDRESS_BUFFER);
        let encoded = host.base58.get(&address).cloned().unwrap_or_default();
        host.fill(result_ptr, max_len, encoded.as_bytes())
    })
}

pub unsafe fn address_base58_to_bytes(
    base58_ptr: GuestPtr,
    base58_len: Len,
    result_ptr: GuestPtr,
) -> Len {
    with_host(|host| {
        let encoded = host.read_str(base58_ptr, base58_len);
        let address = host
            .base58
            .iter()
            .find(|(_, text)| **text == encoded)
            .map(|(bytes, _)| bytes.clone())
            .unwrap_or_default();
        host.fill(result_ptr, ADDRESS_BUFFER, &address)
    })
}

pub unsafe fn host_declare_external_state(
    claim_ptr: GuestPtr,
    claim_len: Len,
    claim_id_ptr: GuestPtr,
    claim_id_size: Len,
) -> Len {
    with_host(|host| {
        let claim = host.read_str(claim_ptr, claim_len);
        let claim_id = host.claim_ids.get(&claim).cloned().unwrap_or_default();
        host.fill(claim_id_ptr, claim_id_size, claim_id.as_bytes())
    })
}

/// 1 when `claim_id` was handed out by a declaration, 0 otherwise
pub unsafe fn host_provide_evidence(
    claim_id_ptr: GuestPtr,
    claim_id_len: Len,
    evidence_ptr: GuestPtr,
    evidence_len: Len,
) -> u32 {
    with_host(|host| {
        let claim_id = host.read_str(claim_id_ptr, claim_id_len);
        if !host.claim_ids.values().any(|id| *id == claim_id) {
            return 0;
        }
        let evidence = host.read_str(evidence_ptr, evidence_len);
        host.evidence.push((claim_id, evidence));
        1
    })
}

pub unsafe fn host_query_controlled_state(
    claim_id_ptr: GuestPtr,
    claim_id_len: Len,
    result_ptr: GuestPtr,
    result_size: Len,
) -> Len {
    with_host(|host| {
        let claim_id = host.read_str(claim_id_ptr, claim_id_len);
        let state = host.controlled_state.get(&claim_id).cloned().unwrap_or_default();
        host.fill(result_ptr, result_size, state.as_bytes())
    })
}
