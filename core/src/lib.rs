//! KPI scoring and bonus engine.
//!
//! Pure, synchronous computation over plain records:
//!   - tiered point conversion and per-category aggregation
//!   - employee and team-dashboard bonus calculation
//!   - the fiscal-period and seasonal SA adjustments
//!   - capacity-weighted target distribution
//!   - SA completion forecasting
//!
//! Configuration is passed explicitly into every call; nothing here holds
//! shared state, so scoring many employees in parallel needs no locking.

pub mod aggregate;
pub mod bonus;
pub mod config;
pub mod distribution;
pub mod error;
pub mod fiscal;
pub mod forecast;
pub mod sa_jobs;
pub mod sa_targets;
pub mod scoring;
pub mod seasonal;
pub mod types;
pub mod validation;
