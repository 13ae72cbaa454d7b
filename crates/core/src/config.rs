//! Build option types

use serde::{Deserialize, Serialize};

/// Options controlling one distribution build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Hash used for leaves and nodes
    #[serde(default)]
    pub hash: HashAlgorithm,

    /// How claim indices are assigned
    #[serde(default)]
    pub index_order: IndexOrder,

    /// What to do with repeated accounts
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Hash on the rayon pool (needs the `parallel` feature of the merkle crate)
    #[serde(default)]
    pub parallel: bool,
}

/// 256-bit hash primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Keccak-256, as computed by the EVM `keccak256` opcode
    #[default]
    Keccak256,
    /// SHA-256
    Sha256,
}

/// Index assignment policy.
///
/// The order is part of the commitment: a verifier needs the same index
/// for every claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexOrder {
    /// Sort by account bytes; insertion order of the input is irrelevant
    #[default]
    AddressAscending,
    /// Keep the order in which each account first appears
    FirstOccurrence,
}

/// Handling of the same account appearing more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Sum amounts and union tags
    #[default]
    Merge,
    /// Fail with `DuplicateAccountConflict`
    Reject,
}

/// Text encoding of amounts in the output document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AmountEncoding {
    /// `0x`-prefixed hex
    #[default]
    Hex,
    /// Base-10 digits
    Decimal,
}
