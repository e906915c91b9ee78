use crate::result::AbiError;
use crate::GuestPtr;
use crate::Len;
use crate::WasmSize;
use crate::NULL_PTR;

pub const BUFFER_ITEMS: usize = 2;
pub const BUFFER_BYTES: usize = std::mem::size_of::<WasmSize>() * BUFFER_ITEMS;

/// Buffer is a 2 item WasmSize array of offset/length
/// exists so that the guest can hand regions of linear memory to the host without relying on
/// compiler specific representations of slices, boxes or vectors
///
/// the offset always represents a position in wasm linear memory _never_ on the host
/// the length always represents u8 bytes _not_ items
///
/// a Buffer is only valid for the invocation that allocated it
/// there is no free: the host discards the whole arena once the invocation returns, so a Buffer
/// deliberately implements neither Drop nor any ownership of the bytes it points at
///
/// reading past `len` bytes from `ptr` is never valid
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Buffer([WasmSize; BUFFER_ITEMS]);

impl Buffer {
    pub const EMPTY: Buffer = Buffer([NULL_PTR, 0]);

    pub fn new(ptr: GuestPtr, len: Len) -> Self {
        Self([ptr, len])
    }

    pub fn ptr(&self) -> GuestPtr {
        (self.0)[0]
    }

    pub fn len(&self) -> Len {
        (self.0)[1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// true when the allocator reported failure or the host reported absence
    pub fn is_null(&self) -> bool {
        self.ptr() == NULL_PTR
    }

    /// a buffer is only worth reading if it has both a real offset and some bytes
    pub fn is_readable(&self) -> bool {
        !self.is_null() && !self.is_empty()
    }

    /// the same region truncated to `len` bytes
    /// used once the host reports how many bytes of a fixed capacity buffer it actually wrote
    pub fn truncate(&self, len: Len) -> Self {
        Self([self.ptr(), len.min(self.len())])
    }
}

/// wraps a naked array in a Buffer newtype for type safety
impl From<[WasmSize; BUFFER_ITEMS]> for Buffer {
    fn from(array: [WasmSize; BUFFER_ITEMS]) -> Self {
        Self(array)
    }
}

impl From<Buffer> for [WasmSize; BUFFER_ITEMS] {
    fn from(buffer: Buffer) -> Self {
        buffer.0
    }
}

/// attempts to rebuild a Buffer from its little endian wire form
/// this fails if the slice is not exactly BUFFER_BYTES long
impl TryFrom<&[u8]> for Buffer {
    type Error = AbiError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != BUFFER_BYTES {
            return Err(AbiError::PointerMap);
        }
        let (ptr, len) = bytes.split_at(std::mem::size_of::<WasmSize>());
        Ok(Self([
            WasmSize::from_le_bytes(ptr.try_into()?),
            WasmSize::from_le_bytes(len.try_into()?),
        ]))
    }
}
