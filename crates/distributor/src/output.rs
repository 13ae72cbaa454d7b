//! Publishable JSON document.
//!
//! ```json
//! {
//!   "merkleRoot": "0x…",
//!   "tokenTotal": "0x…",
//!   "claims": {
//!     "0xAbC…": { "index": 0, "amount": "0x…", "proof": ["0x…"], "flags": { "airdrop": true } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use merkledrop_core::{
    checksum_address, format_amount_hex, format_digest, lowercase_address, parse_address,
    parse_amount, parse_digest, AmountEncoding, DistributorError, HashAlgorithm, Result, U256,
};
use merkledrop_merkle::verify_claim;

use crate::assemble::DistributorInfo;

fn default_checksum() -> bool {
    true
}

/// How amounts and account keys are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default)]
    pub amount_encoding: AmountEncoding,
    /// EIP-55 keys when set, lowercase otherwise
    #[serde(default = "default_checksum")]
    pub checksum_addresses: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            amount_encoding: AmountEncoding::default(),
            checksum_addresses: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEntry {
    pub index: u64,
    pub amount: String,
    pub proof: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionFile {
    pub merkle_root: String,
    pub token_total: String,
    /// Keyed by account, in index order
    pub claims: IndexMap<String, ClaimEntry>,
}

impl DistributionFile {
    pub fn from_info(info: &DistributorInfo, options: &OutputOptions) -> Self {
        let encode = |amount: &U256| match options.amount_encoding {
            AmountEncoding::Hex => format_amount_hex(amount),
            AmountEncoding::Decimal => amount.to_string(),
        };

        let claims = info
            .claims
            .iter()
            .map(|claim| {
                let key = if options.checksum_addresses {
                    checksum_address(&claim.account)
                } else {
                    lowercase_address(&claim.account)
                };
                let flags = (!info.tags.is_empty()).then(|| info.tags.describe(&claim.flags));
                let entry = ClaimEntry {
                    index: claim.index,
                    amount: encode(&claim.amount),
                    proof: claim.proof.iter().map(format_digest).collect(),
                    flags,
                };
                (key, entry)
            })
            .collect();

        Self {
            merkle_root: format_digest(&info.root),
            token_total: encode(&info.token_total),
            claims,
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DistributorError::InternalInconsistency(format!("failed to encode distribution: {}", e))
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DistributorError::MalformedInput(format!("invalid distribution file: {}", e)))
    }

    /// Accounts whose claim does not verify against `merkleRoot`.
    ///
    /// Fails only when the document itself cannot be decoded.
    pub fn invalid_claims(&self, hash: HashAlgorithm) -> Result<Vec<String>> {
        let root = parse_digest(&self.merkle_root)?;
        let mut invalid = Vec::new();
        for (key, entry) in &self.claims {
            let account = parse_address(key)?;
            let amount = parse_amount(key, &entry.amount)?;
            let proof = entry
                .proof
                .iter()
                .map(|p| parse_digest(p))
                .collect::<Result<Vec<_>>>()?;
            if !verify_claim(hash, &root, entry.index, &account, &amount, &proof) {
                invalid.push(key.clone());
            }
        }
        Ok(invalid)
    }

    /// Check every claim against the root and the amounts against
    /// `tokenTotal`.
    pub fn verify_claims(&self, hash: HashAlgorithm) -> Result<bool> {
        let invalid = self.invalid_claims(hash)?;
        if !invalid.is_empty() {
            warn!("{} of {} claims fail verification", invalid.len(), self.claims.len());
            return Ok(false);
        }

        let mut sum = U256::ZERO;
        for (key, entry) in &self.claims {
            let amount = parse_amount(key, &entry.amount)?;
            sum = match sum.checked_add(amount) {
                Some(s) => s,
                None => {
                    warn!("Claim amounts overflow 256 bits at {}", key);
                    return Ok(false);
                }
            };
        }
        let total = parse_amount("tokenTotal", &self.token_total)?;
        if sum != total {
            warn!("tokenTotal {} does not match claim sum {}", total, sum);
            return Ok(false);
        }
        Ok(true)
    }
}
