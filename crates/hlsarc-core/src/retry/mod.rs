//! Retrying of failed fetches.
//!
//! Every failed attempt is mapped to a [`FailureKind`]; transient kinds are
//! retried with exponential backoff until the attempt budget is spent.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{curl_failure, status_failure};
pub use error::FetchError;
pub use policy::{Backoff, FailureKind, RetryPolicy};
pub use run::run_with_retry;
