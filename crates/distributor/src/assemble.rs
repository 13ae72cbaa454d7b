//! Commitment assembly and self-check.

use std::collections::HashSet;

use tracing::{debug, info};

use merkledrop_core::{
    checksum_address, format_digest, Address, Amount, BalanceRecord, Digest, DistributorError,
    HashAlgorithm, Result, TagFlags, TagTable, U256,
};
use merkledrop_merkle::{verify_claim, MerkleTree};

/// One account's claim: everything a verifier needs besides the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub index: u64,
    pub account: Address,
    pub amount: Amount,
    /// Sibling digests from leaf level to root
    pub proof: Vec<Digest>,
    pub flags: TagFlags,
}

/// Merkle distribution ready for publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributorInfo {
    /// Hash used for leaves and nodes
    pub hash: HashAlgorithm,
    /// Merkle root of all claims
    pub root: Digest,
    /// Exact sum of all claim amounts
    pub token_total: Amount,
    /// Claims in index order; `claims[i].index == i`
    pub claims: Vec<Claim>,
    /// Tag names behind the claim flag bits
    pub tags: TagTable,
}

impl DistributorInfo {
    /// Claim for a specific account.
    ///
    /// Returns `None` if the account is not in the distribution.
    pub fn claim_for(&self, account: &Address) -> Option<&Claim> {
        self.claims.iter().find(|c| c.account == *account)
    }

    /// Check a claim against this distribution's root.
    pub fn verify_claim(&self, claim: &Claim) -> bool {
        verify_claim(
            self.hash,
            &self.root,
            claim.index,
            &claim.account,
            &claim.amount,
            &claim.proof,
        )
    }

    /// Names of the tags set on `claim`.
    pub fn tag_names<'a>(&'a self, claim: &'a Claim) -> Vec<&'a str> {
        self.tags.names_of(&claim.flags).collect()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Re-derive the commitment invariants from the assembled data:
    /// total equals the sum of amounts, indices are `0..n` with one claim per
    /// account, and every claim verifies against the root.
    pub fn self_check(&self) -> Result<()> {
        let inconsistent = |msg: String| Err(DistributorError::InternalInconsistency(msg));

        if self.claims.is_empty() {
            return inconsistent("distribution has no claims".to_string());
        }

        let mut sum = U256::ZERO;
        let mut seen = HashSet::with_capacity(self.claims.len());
        for (position, claim) in self.claims.iter().enumerate() {
            if claim.index != position as u64 {
                return inconsistent(format!(
                    "claim at position {} has index {}",
                    position, claim.index
                ));
            }
            if !seen.insert(claim.account) {
                return inconsistent(format!(
                    "account {} appears more than once",
                    checksum_address(&claim.account)
                ));
            }
            sum = match sum.checked_add(claim.amount) {
                Some(s) => s,
                None => return inconsistent("claim amounts overflow 256 bits".to_string()),
            };
            if !self.verify_claim(claim) {
                return inconsistent(format!(
                    "proof for {} (index {}) does not reach root {}",
                    checksum_address(&claim.account),
                    claim.index,
                    format_digest(&self.root)
                ));
            }
        }

        if sum != self.token_total {
            return inconsistent(format!(
                "token total {} differs from claim sum {}",
                self.token_total, sum
            ));
        }

        Ok(())
    }
}

/// Package ordered records, their tree and tag table into a distribution.
///
/// `records[i]` must be the record hashed into leaf `i` of `tree`.
pub fn assemble(
    records: Vec<BalanceRecord>,
    tags: TagTable,
    tree: &MerkleTree,
    parallel: bool,
) -> Result<DistributorInfo> {
    if records.len() != tree.leaf_count() {
        return Err(DistributorError::InternalInconsistency(format!(
            "{} records for {} leaves",
            records.len(),
            tree.leaf_count()
        )));
    }

    let mut token_total = U256::ZERO;
    for record in &records {
        token_total = token_total.checked_add(record.amount).ok_or_else(|| {
            DistributorError::AmountOverflow {
                account: checksum_address(&record.account),
            }
        })?;
    }

    let proofs = tree.proofs(parallel);
    let claims: Vec<Claim> = records
        .into_iter()
        .zip(proofs)
        .map(|(record, proof)| Claim {
            index: proof.leaf_index as u64,
            account: record.account,
            amount: record.amount,
            proof: proof.siblings,
            flags: record.flags,
        })
        .collect();

    let info = DistributorInfo {
        hash: tree.hash_algorithm(),
        root: tree.root(),
        token_total,
        claims,
        tags,
    };

    info.self_check()?;
    debug!("Self-check passed for {} claims", info.len());

    info!(
        "Assembled distribution: {} claims, total {}, root {}",
        info.len(),
        info.token_total,
        format_digest(&info.root),
    );

    Ok(info)
}
