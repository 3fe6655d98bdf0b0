//! Key Pool Module
//!
//! This module manages the pool of API keys used for every generative-AI call.
//! Deployments commonly supply several free-tier keys; the pool rotates to the
//! next one when the invoker classifies a failure as quota-related, so a retry
//! does not burn the same exhausted key.
//!
//! The pool is an explicitly constructed value shared via `Arc`, never an
//! implicit global, so tests can build isolated instances.

mod key_pool;
mod source;

pub use key_pool::{KeyPool, PoolError};
pub use source::{collect_keys, sanitize_key, KeySource};
