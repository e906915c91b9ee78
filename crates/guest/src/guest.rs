pub use tracing;
pub use wes_abi_common::*;

pub mod abi;
pub mod config;
pub mod context;
pub mod memory;
pub mod sys;
pub mod transaction;

pub use config::OUTPUT_FAILED;
pub use context::Invocation;
pub use transaction::TransactionBuilder;

#[macro_export]
/// given a Result
/// - if it is Ok, evaluate to the inner value
/// - if it is Err, log the error and short circuit (return early) with `$fail`
///
/// boundary functions use this to collapse any failure into their sentinel value
macro_rules! try_or {
    ( $e:expr, $fail:expr ) => {{
        match $e {
            Ok(v) => v,
            Err(e) => {
                $crate::tracing::debug!(error = %e, "host boundary call abandoned");
                return $fail;
            }
        }
    }};
}
