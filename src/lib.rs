//! TKB Paper Table Library
//!
//! Windowed row cache and range-fetch coordinator for the paper list: a
//! virtualized table reads rows synchronously while pages of the active
//! search are fetched from the TKB server on demand.

pub mod cache;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod services;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;
