//! Host import function bindings.
//!
//! On `wasm32` these are the real `env` imports. Everywhere else an in-process mock host
//! stands in so the guest can be exercised by native tests.

#[cfg(target_arch = "wasm32")]
#[path = "sys/host.rs"]
mod bindings;

#[cfg(not(target_arch = "wasm32"))]
#[path = "sys/mock.rs"]
mod bindings;

pub use self::bindings::*;
