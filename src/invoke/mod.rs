//! Resilient Invocation Module
//!
//! Wraps any asynchronous remote operation with bounded retry, exponential
//! backoff, and classification-driven key rotation. This is the single place
//! that decides retry vs. propagate vs. fallback; feature adapters above it
//! never re-implement retry logic.

mod classify;
mod invoker;
mod policy;

pub use classify::{classify_message, classify_status, ErrorClass};
pub use invoker::{with_resilience, with_resilience_cancellable};
pub use policy::RetryPolicy;
