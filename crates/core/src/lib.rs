//! MerkleDrop Core Types
//!
//! This crate defines the data structures shared by the Merkle tree builder
//! and the distributor pipeline: accounts, amounts, digests, attribution
//! tags, build options and the error taxonomy.

mod address;
mod config;
mod error;
mod tags;
mod types;

pub use address::*;
pub use config::*;
pub use error::*;
pub use tags::*;
pub use types::*;
