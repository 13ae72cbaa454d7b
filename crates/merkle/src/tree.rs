//! Binary Merkle tree for distribution claims.
//!
//! Leaf `i` is `leaf_hash(i, account, amount)`. Each level is paired in
//! index order; an odd level pairs its last node with itself. Parents are
//! `hash_pair(a, b)`, which sorts the two digests before hashing.

use tracing::debug;

use merkledrop_core::{Address, Amount, BalanceRecord, Digest, DistributorError, HashAlgorithm, Result};

use crate::hash::{hash_pair, leaf_hash};

/// A Merkle proof consisting of sibling hashes along the path to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// Sibling hashes from leaf level to root (bottom-up).
    pub siblings: Vec<Digest>,
    /// Index of the leaf in the tree.
    pub leaf_index: usize,
}

/// A binary Merkle tree.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    hash: HashAlgorithm,
    /// All nodes stored level by level, bottom-up. `layers[0]` = leaves.
    /// Levels are stored unpadded.
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree from ordered balance records; record `i` gets index `i`.
    pub fn from_records(hash: HashAlgorithm, records: &[BalanceRecord], parallel: bool) -> Result<Self> {
        let leaves = collect_indexed(records.len(), parallel, |i| {
            let record = &records[i];
            leaf_hash(hash, i as u64, &record.account, &record.amount)
        });
        Self::from_leaves(hash, leaves, parallel)
    }

    /// Build a tree from pre-hashed leaves.
    pub fn from_leaves(hash: HashAlgorithm, leaves: Vec<Digest>, parallel: bool) -> Result<Self> {
        if leaves.is_empty() {
            return Err(DistributorError::EmptyInput);
        }

        let leaf_count = leaves.len();
        let mut layers = vec![leaves];

        loop {
            let prev = &layers[layers.len() - 1];
            if prev.len() <= 1 {
                break;
            }
            let next = collect_indexed(prev.len().div_ceil(2), parallel, |i| {
                let left = &prev[2 * i];
                let right = prev.get(2 * i + 1).unwrap_or(left);
                hash_pair(hash, left, right)
            });
            layers.push(next);
        }

        let tree = Self { hash, layers };
        debug!(
            "Built Merkle tree: {} leaves, depth {}, root {}",
            leaf_count,
            tree.depth(),
            hex_prefix(&tree.root()),
        );
        Ok(tree)
    }

    /// Get the Merkle root.
    pub fn root(&self) -> Digest {
        // Construction guarantees a non-empty top layer.
        self.layers[self.layers.len() - 1][0]
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// Leaf digest at `index`.
    pub fn leaf(&self, index: usize) -> Option<Digest> {
        self.layers[0].get(index).copied()
    }

    /// Number of leaves (no padding).
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of levels above the leaves; also the length of every proof.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Generate a proof for the leaf at the given index.
    ///
    /// Returns `None` if the index is out of range.
    pub fn proof(&self, leaf_index: usize) -> Option<MerkleProof> {
        if leaf_index >= self.leaf_count() {
            return None;
        }

        Some(MerkleProof {
            siblings: self.sibling_path(leaf_index),
            leaf_index,
        })
    }

    /// Proofs for every leaf, in index order.
    pub fn proofs(&self, parallel: bool) -> Vec<MerkleProof> {
        collect_indexed(self.leaf_count(), parallel, |i| MerkleProof {
            siblings: self.sibling_path(i),
            leaf_index: i,
        })
    }

    /// Siblings of an in-range leaf, bottom-up.
    fn sibling_path(&self, leaf_index: usize) -> Vec<Digest> {
        let mut idx = leaf_index;
        self.layers[..self.depth()]
            .iter()
            .map(|layer| {
                // A missing right sibling means the node was paired with itself
                let sibling = *layer.get(idx ^ 1).unwrap_or(&layer[idx]);
                idx /= 2;
                sibling
            })
            .collect()
    }

    /// Verify a proof against this tree's root.
    pub fn verify(&self, leaf: &Digest, proof: &MerkleProof) -> bool {
        verify_proof(self.hash, &self.root(), leaf, &proof.siblings)
    }
}

/// Fold `siblings` into `leaf` with the sorted-pair rule and compare to `root`.
pub fn verify_proof(hash: HashAlgorithm, root: &Digest, leaf: &Digest, siblings: &[Digest]) -> bool {
    let computed = siblings
        .iter()
        .fold(*leaf, |current, sibling| hash_pair(hash, &current, sibling));
    computed == *root
}

/// Recompute the leaf of a claim and verify its proof.
pub fn verify_claim(
    hash: HashAlgorithm,
    root: &Digest,
    index: u64,
    account: &Address,
    amount: &Amount,
    siblings: &[Digest],
) -> bool {
    let leaf = leaf_hash(hash, index, account, amount);
    verify_proof(hash, root, &leaf, siblings)
}

fn hex_prefix(digest: &Digest) -> String {
    hex::encode(&digest[..8])
}

/// Evaluate `f(0..len)` into a vector in index order.
#[cfg(feature = "parallel")]
fn collect_indexed<T, F>(len: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        (0..len).into_par_iter().map(f).collect()
    } else {
        (0..len).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_indexed<T, F>(len: usize, _parallel: bool, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..len).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use merkledrop_core::{TagFlags, U256};

    const H: HashAlgorithm = HashAlgorithm::Keccak256;

    fn record(byte: u8, amount: u64) -> BalanceRecord {
        BalanceRecord::new(Address::from([byte; 20]), U256::from(amount), TagFlags::default())
    }

    fn leaf_of(index: u64, byte: u8, amount: u64) -> Digest {
        leaf_hash(H, index, &Address::from([byte; 20]), &U256::from(amount))
    }

    #[test]
    fn test_single_leaf() {
        let tree = MerkleTree::from_records(H, &[record(1, 100)], false).unwrap();

        // Single leaf: root == leaf, no combination, empty proof
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.root(), leaf_of(0, 1, 100));
        assert!(tree.proof(0).unwrap().siblings.is_empty());
    }

    #[test]
    fn test_power_of_two() {
        let records = vec![record(1, 10), record(2, 20), record(3, 30), record(4, 40)];
        let tree = MerkleTree::from_records(H, &records, false).unwrap();
        assert_eq!(tree.leaf_count(), 4);

        // Manually compute expected root
        let l0 = leaf_of(0, 1, 10);
        let l1 = leaf_of(1, 2, 20);
        let l2 = leaf_of(2, 3, 30);
        let l3 = leaf_of(3, 4, 40);
        let h01 = hash_pair(H, &l0, &l1);
        let h23 = hash_pair(H, &l2, &l3);
        let expected = hash_pair(H, &h01, &h23);
        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn test_odd_level_duplicates_last() {
        // 3 entries: last leaf pairs with itself
        let records = vec![record(1, 10), record(2, 20), record(3, 30)];
        let tree = MerkleTree::from_records(H, &records, false).unwrap();
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);

        let l0 = leaf_of(0, 1, 10);
        let l1 = leaf_of(1, 2, 20);
        let l2 = leaf_of(2, 3, 30);
        let h01 = hash_pair(H, &l0, &l1);
        let h22 = hash_pair(H, &l2, &l2);
        let expected = hash_pair(H, &h01, &h22);
        assert_eq!(tree.root(), expected);

        let proof = tree.proof(2).unwrap();
        assert_eq!(proof.siblings, vec![l2, h01]);
    }

    #[test]
    fn test_proof_length_is_ceil_log2() {
        for (n, depth) in [(1usize, 0usize), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (17, 5)] {
            let records: Vec<_> = (0..n).map(|i| record(i as u8, i as u64)).collect();
            let tree = MerkleTree::from_records(H, &records, false).unwrap();
            assert_eq!(tree.depth(), depth, "depth for {} leaves", n);
            for proof in tree.proofs(false) {
                assert_eq!(proof.siblings.len(), depth);
            }
        }
    }

    #[test]
    fn test_proof_verify_roundtrip() {
        let records: Vec<_> = (0..7u8).map(|i| record(i, i as u64 * 100)).collect();
        let tree = MerkleTree::from_records(H, &records, false).unwrap();
        let root = tree.root();

        for (i, r) in records.iter().enumerate() {
            let proof = tree.proof(i).expect("proof should exist");
            assert!(
                verify_claim(H, &root, i as u64, &r.account, &r.amount, &proof.siblings),
                "proof for leaf {} should verify",
                i
            );
            assert!(tree.verify(&tree.leaf(i).unwrap(), &proof));
        }
    }

    #[test]
    fn test_proofs_match_single_proof() {
        let records: Vec<_> = (0..11u8).map(|i| record(i, i as u64)).collect();
        let tree = MerkleTree::from_records(H, &records, false).unwrap();
        let all = tree.proofs(false);
        assert_eq!(all.len(), 11);
        for (i, proof) in all.iter().enumerate() {
            assert_eq!(Some(proof.clone()), tree.proof(i));
        }
        // Leaf 10 has no right neighbour and is paired with itself
        assert_eq!(all[10].siblings[0], tree.leaf(10).unwrap());
    }

    #[test]
    fn test_wrong_leaf_fails() {
        let tree = MerkleTree::from_records(H, &[record(1, 10), record(2, 20)], false).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(!tree.verify(&leaf_of(0, 99, 999), &proof));
    }

    #[test]
    fn test_wrong_index_fails() {
        let tree = MerkleTree::from_records(H, &[record(1, 10), record(2, 20)], false).unwrap();
        let proof = tree.proof(0).unwrap();
        let account = Address::from([1u8; 20]);
        assert!(!verify_claim(H, &tree.root(), 1, &account, &U256::from(10u64), &proof.siblings));
    }

    #[test]
    fn test_wrong_root_fails() {
        let tree = MerkleTree::from_records(H, &[record(1, 10), record(2, 20)], false).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(!verify_proof(H, &[0xFFu8; 32], &leaf_of(0, 1, 10), &proof.siblings));
    }

    #[test]
    fn test_empty_leaves_rejected() {
        let err = MerkleTree::from_leaves(H, Vec::new(), false).unwrap_err();
        assert_eq!(err, DistributorError::EmptyInput);
    }

    #[test]
    fn test_proof_out_of_range() {
        let tree = MerkleTree::from_records(H, &[record(1, 10), record(2, 20)], false).unwrap();
        assert!(tree.proof(2).is_none());
    }

    #[test]
    fn test_deterministic() {
        let records = vec![record(1, 10), record(2, 20), record(3, 30)];
        let tree1 = MerkleTree::from_records(H, &records, false).unwrap();
        let tree2 = MerkleTree::from_records(H, &records, false).unwrap();
        assert_eq!(tree1.root(), tree2.root());
    }

    #[test]
    fn test_parallel_flag_same_root() {
        // Without the `parallel` feature this exercises the fallback path.
        let records: Vec<_> = (0..33u8).map(|i| record(i, i as u64 * 7)).collect();
        let seq = MerkleTree::from_records(H, &records, false).unwrap();
        let par = MerkleTree::from_records(H, &records, true).unwrap();
        assert_eq!(seq.root(), par.root());
        assert_eq!(seq.proofs(false), par.proofs(true));
    }

    #[test]
    fn test_hex_prefix() {
        let mut digest = [0u8; 32];
        digest[0] = 0xab;
        digest[7] = 0x01;
        digest[8] = 0xff;
        assert_eq!(hex_prefix(&digest), "ab00000000000001");
    }

    #[test]
    fn test_hash_algorithms_differ() {
        let records = vec![record(1, 10), record(2, 20)];
        let keccak = MerkleTree::from_records(HashAlgorithm::Keccak256, &records, false).unwrap();
        let sha = MerkleTree::from_records(HashAlgorithm::Sha256, &records, false).unwrap();
        assert_ne!(keccak.root(), sha.root());
        assert_eq!(sha.hash_algorithm(), HashAlgorithm::Sha256);
    }
}
