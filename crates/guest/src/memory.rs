//! Moving bytes between the guest and the host's linear memory.
//!
//! Every buffer comes from the host `malloc` and is never freed. The arena is reclaimed
//! wholesale when the invocation ends, so a [`Buffer`] is only meaningful until then.
//!
//! Writes are only exposed fused with the allocation that sizes them ([`write_buffer`],
//! [`allocate_string`], [`allocate_bytes`]). There is no way to write into a region of unknown
//! size from outside this module.

use crate::sys;
use wes_abi_common::types::u64_from_le;
use wes_abi_common::AbiError;
use wes_abi_common::Buffer;
use wes_abi_common::GuestPtr;
use wes_abi_common::Len;
use wes_abi_common::AMOUNT_BYTES;
use wes_abi_common::NULL_PTR;

/// Raw host allocation. `0` when the host is out of memory.
pub fn allocate(len: Len) -> GuestPtr {
    let ptr = unsafe { sys::malloc(len) };
    if ptr == NULL_PTR {
        tracing::warn!(len, "host allocator returned a null offset");
    }
    ptr
}

/// A fresh, host written region of `len` bytes.
pub fn reserve(len: Len) -> Result<Buffer, AbiError> {
    match allocate(len) {
        NULL_PTR => Err(AbiError::OutOfMemory),
        ptr => Ok(Buffer::new(ptr, len)),
    }
}

/// Allocates exactly `bytes.len()` and copies `bytes` in.
pub fn write_buffer(bytes: &[u8]) -> Result<Buffer, AbiError> {
    let len: Len = bytes.len().try_into()?;
    let buffer = reserve(len)?;
    if !bytes.is_empty() {
        unsafe { sys::write_memory(buffer.ptr(), bytes) };
    }
    Ok(buffer)
}

pub fn write_str_buffer(s: &str) -> Result<Buffer, AbiError> {
    write_buffer(s.as_bytes())
}

/// Sentinel form of [`write_str_buffer`], `0` on failure.
pub fn allocate_string(s: &str) -> GuestPtr {
    write_str_buffer(s).map(|b| b.ptr()).unwrap_or(NULL_PTR)
}

/// Sentinel form of [`write_buffer`], `0` on failure.
pub fn allocate_bytes(bytes: &[u8]) -> GuestPtr {
    write_buffer(bytes).map(|b| b.ptr()).unwrap_or(NULL_PTR)
}

/// Copies `len` bytes out of linear memory. A null offset or a zero length is an empty read.
pub fn read_bytes(ptr: GuestPtr, len: Len) -> Vec<u8> {
    if ptr == NULL_PTR || len == 0 {
        return vec![];
    }
    unsafe { sys::read_memory(ptr, len) }
}

pub fn read_buffer(buffer: &Buffer) -> Vec<u8> {
    read_bytes(buffer.ptr(), buffer.len())
}

pub fn try_read_string(ptr: GuestPtr, len: Len) -> Result<String, AbiError> {
    Ok(String::from_utf8(read_bytes(ptr, len))?)
}

/// Like [`try_read_string`] but invalid utf-8 reads as `""`.
pub fn read_string(ptr: GuestPtr, len: Len) -> String {
    try_read_string(ptr, len).unwrap_or_else(|e| {
        tracing::warn!(ptr, len, error = %e, "discarding non utf-8 bytes from linear memory");
        String::new()
    })
}

/// All 8 little endian bytes at `ptr` as a u64, `0` for a null offset.
pub fn read_u64_le(ptr: GuestPtr) -> u64 {
    u64_from_le(&read_bytes(ptr, AMOUNT_BYTES as Len)).unwrap_or(0)
}
