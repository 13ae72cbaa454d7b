//! Hash primitive, leaf encoding and sorted-pair node combination.
//!
//! Leaf preimage: `uint256(index) || address || uint256(amount)`, the layout
//! of Solidity's `abi.encodePacked(uint256, address, uint256)`.
//! Node: `H(min(a, b) || max(a, b))`.

use alloy_primitives::Keccak256;
use sha2::{Digest as _, Sha256};

use merkledrop_core::{Address, Amount, Digest, HashAlgorithm};

/// 32-byte index, 20-byte account, 32-byte amount.
pub const LEAF_PREIMAGE_LEN: usize = 32 + 20 + 32;

/// Hash the concatenation of `parts`.
pub fn hash_parts(algorithm: HashAlgorithm, parts: &[&[u8]]) -> Digest {
    match algorithm {
        HashAlgorithm::Keccak256 => {
            let mut hasher = Keccak256::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().0
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            for part in parts {
                hasher.update(part);
            }
            let result = hasher.finalize();
            let mut out = [0u8; 32];
            out.copy_from_slice(&result);
            out
        }
    }
}

/// Fixed-width big-endian leaf encoding.
pub fn leaf_preimage(index: u64, account: &Address, amount: &Amount) -> [u8; LEAF_PREIMAGE_LEN] {
    let mut out = [0u8; LEAF_PREIMAGE_LEN];
    out[24..32].copy_from_slice(&index.to_be_bytes());
    out[32..52].copy_from_slice(account.as_slice());
    out[52..].copy_from_slice(&amount.to_be_bytes::<32>());
    out
}

/// Leaf digest for one claim.
///
/// This MUST match the leaf the claim contract recomputes from
/// `(index, account, amount)`.
pub fn leaf_hash(algorithm: HashAlgorithm, index: u64, account: &Address, amount: &Amount) -> Digest {
    hash_parts(algorithm, &[leaf_preimage(index, account, amount).as_slice()])
}

/// Combine two sibling digests; the result does not depend on argument order.
pub fn hash_pair(algorithm: HashAlgorithm, a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    hash_parts(algorithm, &[lo.as_slice(), hi.as_slice()])
}
