//! Reward sources.
//!
//! A distribution can combine several balance inputs, each optionally tagged
//! with the reason it pays out. A previously published distribution can be fed
//! back in as a source to build a cumulative one.

use merkledrop_core::lowercase_address;

use crate::assemble::DistributorInfo;
use crate::input::{BalanceInput, EarningsEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSource {
    /// Tag applied to every row of `input`, in addition to row reasons
    pub tag: Option<String>,
    pub input: BalanceInput,
}

impl RewardSource {
    pub fn untagged(input: BalanceInput) -> Self {
        Self { tag: None, input }
    }

    pub fn tagged(tag: impl Into<String>, input: BalanceInput) -> Self {
        Self {
            tag: Some(tag.into()),
            input,
        }
    }

    /// Source carrying every claim of an earlier distribution, with its tags
    /// preserved as row reasons.
    pub fn from_distribution(info: &DistributorInfo) -> Self {
        let rows = info
            .claims
            .iter()
            .map(|claim| {
                let reasons = info.tag_names(claim).join(",");
                EarningsEntry::new(
                    lowercase_address(&claim.account),
                    claim.amount.to_string(),
                    reasons,
                )
            })
            .collect();
        Self::untagged(BalanceInput::List(rows))
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_from_sources;
    use merkledrop_core::{Address, BuildOptions, U256};

    fn addr(byte: u8) -> String {
        format!("0x{}", format!("{:02x}", byte).repeat(20))
    }

    #[test]
    fn test_from_distribution_round_trips_claims() {
        let first = build_from_sources(
            &[
                RewardSource::tagged("airdrop", BalanceInput::from_pairs([(addr(1), "100"), (addr(2), "5")])),
                RewardSource::tagged("lp", BalanceInput::from_pairs([(addr(1), "1")])),
            ],
            &BuildOptions::default(),
        )
        .unwrap();

        let source = RewardSource::from_distribution(&first);
        assert_eq!(source.tag, None);
        assert_eq!(source.len(), 2);

        let BalanceInput::List(rows) = &source.input else {
            panic!("expected list form");
        };
        let row = rows.iter().find(|r| r.address == addr(1)).unwrap();
        assert_eq!(row.reasons, "airdrop,lp");
        assert_eq!(row.earnings, crate::input::AmountValue::from("101"));
    }

    #[test]
    fn test_cumulative_distribution() {
        let options = BuildOptions::default();
        let first = build_from_sources(
            &[RewardSource::tagged("epoch1", BalanceInput::from_pairs([(addr(1), "100")]))],
            &options,
        )
        .unwrap();

        let second = build_from_sources(
            &[
                RewardSource::from_distribution(&first),
                RewardSource::tagged("epoch2", BalanceInput::from_pairs([(addr(1), "40"), (addr(3), "7")])),
            ],
            &options,
        )
        .unwrap();

        assert_eq!(second.token_total, U256::from(147u64));
        let claim = second.claim_for(&Address::from([1u8; 20])).unwrap();
        assert_eq!(claim.amount, U256::from(140u64));
        assert_eq!(second.tag_names(claim), vec!["epoch1", "epoch2"]);
    }
}
