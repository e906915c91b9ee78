pub mod base64;
pub mod draft;
pub mod hash;
pub mod hex;
pub mod json;
pub mod receipt;
pub mod records;
pub mod result;
pub mod slice;
pub mod types;

pub use result::*;
pub use slice::Buffer;
pub use types::*;

/// something like usize for wasm
/// wasm has a memory limit of 4GB so offsets and lengths fit in u32
///
/// the host reads and writes directly into the guest's linear memory so both sides need a
/// predictable number of bytes to represent offsets and lengths, regardless of the host's
/// native `usize`
pub type WasmSize = u32;

pub type Len = WasmSize;
pub type GuestPtr = WasmSize;

/// reserved offset meaning "allocation failed" or "absent"
/// the host allocator never hands out offset 0 so it is safe to use as a sentinel
pub const NULL_PTR: GuestPtr = 0;
