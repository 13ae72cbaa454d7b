//! Duplicate-account merging.
//!
//! Entries for the same account are summed and their tags unioned into a
//! flag set. The tag table is built once from every tag in the input before
//! any flags are assigned.

use std::collections::HashMap;

use tracing::debug;

use merkledrop_core::{
    checksum_address, Address, BalanceRecord, DistributorError, DuplicatePolicy, Result, TagTable,
};

use crate::normalize::NormalizedEntry;

/// Output of the merge step: one record per account, first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedBalances {
    pub records: Vec<BalanceRecord>,
    pub tags: TagTable,
}

pub fn merge_entries(entries: Vec<NormalizedEntry>, policy: DuplicatePolicy) -> Result<MergedBalances> {
    let tags = TagTable::from_names(entries.iter().flat_map(|e| e.tags.iter()));

    let entry_count = entries.len();
    let mut positions: HashMap<Address, usize> = HashMap::with_capacity(entry_count);
    let mut records: Vec<BalanceRecord> = Vec::with_capacity(entry_count);

    for entry in entries {
        let flags = tags.flags_for(&entry.tags);
        match positions.get(&entry.account) {
            Some(&pos) => {
                if policy == DuplicatePolicy::Reject {
                    return Err(DistributorError::DuplicateAccountConflict {
                        account: checksum_address(&entry.account),
                    });
                }
                let record = &mut records[pos];
                record.amount = record.amount.checked_add(entry.amount).ok_or_else(|| {
                    DistributorError::AmountOverflow {
                        account: checksum_address(&entry.account),
                    }
                })?;
                record.flags.union_with(&flags);
            }
            None => {
                positions.insert(entry.account, records.len());
                records.push(BalanceRecord::new(entry.account, entry.amount, flags));
            }
        }
    }

    debug!(
        "Merged {} entries into {} accounts ({} tags)",
        entry_count,
        records.len(),
        tags.len(),
    );

    Ok(MergedBalances { records, tags })
}
