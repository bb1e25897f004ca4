//! Response classification and column type resolution for a ClickHouse client.
//!
//! A transport hands over a completed [`RawResponse`](protocol::RawResponse);
//! [`classify`](classify::classify) decides whether the engine accepted the query,
//! extracts the engine's error on failure, and resolves every column's type
//! descriptor on success. [`bind`](resultset::bind) turns the result into a
//! [`ResultSet`](resultset::ResultSet) or a typed [`Error`](error::Error).

pub mod classify;
pub mod col;
pub mod constant;
pub mod error;
mod opts;
pub mod protocol;
pub mod resultset;
pub mod row;
pub mod types;

pub use opts::Opts;

#[cfg(test)]
mod classify_test;
