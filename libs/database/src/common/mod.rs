//! Utilities that do not depend on a particular driver

pub mod retry;

pub use retry::{RetryConfig, retry, retry_with_backoff};
