use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status codes shared with the host.
///
/// The host returns these as plain u32 values from calls such as `host_build_transaction`.
/// `0xFFFF_FFFF` is the generic failure flag and folds into ExecutionFailed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    InvalidParams = 1,
    InsufficientBalance = 2,
    Unauthorized = 3,
    NotFound = 4,
    AlreadyExists = 5,
    ExecutionFailed = 6,
    InvalidState = 7,
    Timeout = 8,
    NotImplemented = 9,
    PermissionDenied = 10,
    Unknown = 999,
}

/// the host's generic "this failed" return value
pub const HOST_FAILURE_FLAG: u32 = 0xFFFF_FFFF;

impl ErrorCode {
    pub fn from_host(code: u32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::InvalidParams,
            2 => Self::InsufficientBalance,
            3 => Self::Unauthorized,
            4 => Self::NotFound,
            5 => Self::AlreadyExists,
            6 | HOST_FAILURE_FLAG => Self::ExecutionFailed,
            7 => Self::InvalidState,
            8 => Self::Timeout,
            9 => Self::NotImplemented,
            10 => Self::PermissionDenied,
            _ => Self::Unknown,
        }
    }

    pub fn to_host(self) -> u32 {
        self as u32
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InvalidParams => "Invalid parameters",
            Self::InsufficientBalance => "Insufficient balance",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "Not found",
            Self::AlreadyExists => "Already exists",
            Self::ExecutionFailed => "Execution failed",
            Self::InvalidState => "Invalid state",
            Self::Timeout => "Timeout",
            Self::NotImplemented => "Not implemented",
            Self::PermissionDenied => "Permission denied",
            Self::Unknown => "Unknown error",
        }
    }

    /// Problem Details code the chain service reports for this status, `""` on success.
    pub fn wes_code(self) -> &'static str {
        match self {
            Self::Success => "",
            Self::InvalidParams
            | Self::Unauthorized
            | Self::AlreadyExists
            | Self::PermissionDenied => "COMMON_VALIDATION_ERROR",
            Self::InsufficientBalance => "BC_INSUFFICIENT_BALANCE",
            Self::NotFound => "BC_CONTRACT_NOT_FOUND",
            Self::ExecutionFailed | Self::InvalidState | Self::NotImplemented => {
                "BC_CONTRACT_INVOCATION_FAILED"
            }
            Self::Timeout => "COMMON_TIMEOUT",
            Self::Unknown => "COMMON_INTERNAL_ERROR",
        }
    }

    pub fn http_status(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::InvalidParams => 400,
            Self::Unauthorized => 401,
            Self::PermissionDenied => 403,
            Self::NotFound => 404,
            Self::Timeout => 408,
            Self::AlreadyExists => 409,
            Self::InsufficientBalance | Self::ExecutionFailed | Self::InvalidState => 422,
            Self::Unknown => 500,
            Self::NotImplemented => 501,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Everything that can go wrong on this side of the host boundary.
///
/// None of these ever unwind into the host. Boundary functions either return one of these in a
/// Result or collapse it into the matching sentinel (0 pointer, empty string/buffer).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[rustfmt::skip]
pub enum AbiError {
    /// the host allocator returned the 0 offset
    #[error("host allocator returned a null offset")]
    OutOfMemory,
    /// an optional lookup (state, utxo, resource) found nothing
    #[error("requested value is absent")]
    Absent,
    /// an expected pattern was not found in a payload the host gave us
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// a character outside the base64 alphabet, or a dangling final character
    #[error("invalid base64 byte {byte:#04x} at position {position}")]
    Base64 { byte: u8, position: usize },
    #[error("invalid hex: {0}")]
    Hex(String),
    /// bytes read back from linear memory were not valid utf-8
    #[error("invalid utf-8 in guest memory")]
    Utf8,
    /// the host reported failure through a status code or a populated receipt error
    #[error("host reported failure: {0}")]
    Host(ErrorCode),
    /// offsets and lengths did not fit the 32 bit wasm address space
    #[error("pointer or length does not fit in wasm32")]
    PointerMap,
}

impl AbiError {
    /// status code to report for this error when a caller only has room for a u32
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Host(code) => *code,
            Self::Absent => ErrorCode::NotFound,
            Self::Malformed(_) | Self::Base64 { .. } | Self::Hex(_) | Self::Utf8 => {
                ErrorCode::InvalidParams
            }
            Self::OutOfMemory | Self::PointerMap => ErrorCode::ExecutionFailed,
        }
    }
}

impl From<std::num::TryFromIntError> for AbiError {
    fn from(_: std::num::TryFromIntError) -> Self {
        Self::PointerMap
    }
}

impl From<std::str::Utf8Error> for AbiError {
    fn from(_: std::str::Utf8Error) -> Self {
        Self::Utf8
    }
}

impl From<std::string::FromUtf8Error> for AbiError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Self::Utf8
    }
}

impl From<std::array::TryFromSliceError> for AbiError {
    fn from(_: std::array::TryFromSliceError) -> Self {
        Self::PointerMap
    }
}

impl From<::hex::FromHexError> for AbiError {
    fn from(e: ::hex::FromHexError) -> Self {
        Self::Hex(e.to_string())
    }
}

impl From<ErrorCode> for AbiError {
    fn from(code: ErrorCode) -> Self {
        Self::Host(code)
    }
}
