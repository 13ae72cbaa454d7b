//! Balance normalization: validate raw input into typed entries, and the
//! index ordering applied after merging.

use tracing::debug;

use merkledrop_core::{parse_address, Address, Amount, BalanceRecord, DistributorError, IndexOrder, Result};

use crate::input::{split_tags, BalanceInput};
use crate::source::RewardSource;

/// A validated input row, before duplicate accounts are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub account: Address,
    pub amount: Amount,
    pub tags: Vec<String>,
}

/// Validate every row of `input`, keeping input order.
///
/// `source_tag` is appended to every row's tags. Fails with `EmptyInput`
/// when there are no rows.
pub fn normalize(input: &BalanceInput, source_tag: Option<&str>) -> Result<Vec<NormalizedEntry>> {
    let entries = normalize_rows(input, source_tag)?;
    if entries.is_empty() {
        return Err(DistributorError::EmptyInput);
    }
    Ok(entries)
}

/// Validate every source in order and concatenate the rows.
pub fn normalize_sources(sources: &[RewardSource]) -> Result<Vec<NormalizedEntry>> {
    let mut entries = Vec::new();
    for source in sources {
        entries.extend(normalize_rows(&source.input, source.tag.as_deref())?);
    }
    if entries.is_empty() {
        return Err(DistributorError::EmptyInput);
    }
    debug!("Normalized {} entries from {} sources", entries.len(), sources.len());
    Ok(entries)
}

fn normalize_rows(input: &BalanceInput, source_tag: Option<&str>) -> Result<Vec<NormalizedEntry>> {
    let source_tags: Vec<String> = source_tag
        .map(|t| split_tags(t).map(str::to_string).collect())
        .unwrap_or_default();

    let entries = match input {
        BalanceInput::Map(map) => map
            .iter()
            .map(|(account, amount)| -> Result<NormalizedEntry> {
                Ok(NormalizedEntry {
                    account: parse_address(account)?,
                    amount: amount.to_amount(account)?,
                    tags: source_tags.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        BalanceInput::List(list) => list
            .iter()
            .map(|entry| -> Result<NormalizedEntry> {
                let mut tags: Vec<String> = split_tags(&entry.reasons).map(str::to_string).collect();
                tags.extend(source_tags.iter().cloned());
                Ok(NormalizedEntry {
                    account: parse_address(&entry.address)?,
                    amount: entry.earnings.to_amount(&entry.address)?,
                    tags,
                })
            })
            .collect::<Result<Vec<_>>>()?,
    };

    debug!(
        "Normalized {} {}-form entries{}",
        entries.len(),
        input.shape_name(),
        source_tag.map(|t| format!(" (source {})", t)).unwrap_or_default(),
    );
    Ok(entries)
}

/// Put merged records into index order.
pub fn apply_index_order(records: &mut [BalanceRecord], order: IndexOrder) {
    match order {
        IndexOrder::AddressAscending => records.sort_by(|a, b| a.account.cmp(&b.account)),
        // Merge output is already in first-occurrence order
        IndexOrder::FirstOccurrence => {}
    }
}
