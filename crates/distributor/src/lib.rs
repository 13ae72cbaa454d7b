//! MerkleDrop Distributor
//!
//! Turns account balances into a Merkle distribution: every account gets a
//! claim (index, amount, proof) and the whole set is committed to by one root.
//!
//! ## Pipeline
//!
//! 1. [`normalize`] validates raw input rows into typed entries
//! 2. [`merge_entries`] sums repeated accounts and assigns tag flags
//! 3. [`apply_index_order`] fixes claim indices
//! 4. [`MerkleTree::from_records`] hashes leaves and builds the tree
//! 5. [`assemble`] attaches proofs and runs a self-check
//!
//! [`DistributionFile`] is the JSON form handed to claimants.

pub mod assemble;
pub mod input;
pub mod merge;
pub mod normalize;
pub mod output;
pub mod source;

pub use assemble::{assemble, Claim, DistributorInfo};
pub use input::{split_tags, AmountValue, BalanceInput, EarningsEntry};
pub use merge::{merge_entries, MergedBalances};
pub use normalize::{apply_index_order, normalize, normalize_sources, NormalizedEntry};
pub use output::{ClaimEntry, DistributionFile, OutputOptions};
pub use source::RewardSource;

use tracing::info;

use merkledrop_core::{BuildOptions, Result};
use merkledrop_merkle::MerkleTree;

/// Build a distribution from one balance input.
pub fn build_distribution(input: &BalanceInput, options: &BuildOptions) -> Result<DistributorInfo> {
    info!(
        "Building distribution from {} {}-form entries ({:?}, {:?})",
        input.len(),
        input.shape_name(),
        options.hash,
        options.index_order,
    );
    let entries = normalize(input, None)?;
    build_from_entries(entries, options)
}

/// Build one distribution from several sources.
///
/// Sources are concatenated in order before merging, so an account appearing
/// in more than one source is merged (or rejected) like any other duplicate.
pub fn build_from_sources(sources: &[RewardSource], options: &BuildOptions) -> Result<DistributorInfo> {
    info!("Building distribution from {} sources", sources.len());
    let entries = normalize_sources(sources)?;
    build_from_entries(entries, options)
}

fn build_from_entries(entries: Vec<NormalizedEntry>, options: &BuildOptions) -> Result<DistributorInfo> {
    let MergedBalances { mut records, tags } = merge_entries(entries, options.duplicates)?;
    apply_index_order(&mut records, options.index_order);

    let tree = MerkleTree::from_records(options.hash, &records, options.parallel)?;
    assemble(records, tags, &tree, options.parallel)
}
