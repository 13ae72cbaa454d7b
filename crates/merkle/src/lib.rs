//! MerkleDrop Merkle Tree
//!
//! Binary hash tree over claim leaves, with proof extraction and
//! verification.
//!
//! Leaves commit to `(index, account, amount)`. Internal nodes hash the two
//! children in sorted order, so a proof is a plain list of sibling digests
//! with no left/right bits. The free [`verify_proof`] and [`verify_claim`]
//! functions are what an on-chain consumer reimplements.

pub mod hash;
pub mod tree;

pub use hash::{hash_pair, leaf_hash, leaf_preimage, LEAF_PREIMAGE_LEN};
pub use tree::{verify_claim, verify_proof, MerkleProof, MerkleTree};
