//! Retry and caching policies.
//!
//! This module groups the knobs that control **how long** the bootstrap waits
//! between credential attempts and **how** the descriptor cache coordinates
//! concurrent fetches.
//!
//! ## Contents
//! - [`RetryPolicy`] fixed interval between bootstrap attempts
//! - [`FetchMode`]   whether concurrent descriptor lookups share one fetch
//!
//! ## Quick wiring
//! ```text
//! Config { retry: RetryPolicy, descriptor_fetch: FetchMode, .. }
//!      ├─► core::bootstrap::AuthBootstrap uses retry.next(attempt) after each failure
//!      └─► core::cache::AppDescriptorCache uses descriptor_fetch on a cache miss
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → 1000ms, forever, no growth.
//! - `FetchMode::Uncoordinated` → every miss issues its own fetch.

mod fetch;
mod retry;

pub use fetch::FetchMode;
pub use retry::RetryPolicy;
