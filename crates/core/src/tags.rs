//! Attribution tags and their bit-flag representation.
//!
//! A build derives one [`TagTable`] from every distinct tag it observes.
//! Names are sorted lexicographically and bit `i` is the `i`-th name, so the
//! same input always yields the same flag values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// Sorted tag names; position = bit index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTable {
    names: Vec<String>,
}

impl TagTable {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect();
        Self {
            names: sorted.into_iter().collect(),
        }
    }

    pub fn bit_of(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }

    pub fn name_of(&self, bit: usize) -> Option<&str> {
        self.names.get(bit).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build a flag set from tag names. Names missing from the table are skipped.
    pub fn flags_for<I, S>(&self, names: I) -> TagFlags
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = TagFlags::default();
        for name in names {
            if let Some(bit) = self.bit_of(name.as_ref()) {
                flags.set(bit);
            }
        }
        flags
    }

    /// Names of the bits set in `flags`, in bit order.
    pub fn names_of<'a>(&'a self, flags: &'a TagFlags) -> impl Iterator<Item = &'a str> + 'a {
        flags.iter().filter_map(move |bit| self.name_of(bit))
    }

    /// Every tag in the table mapped to whether `flags` has it.
    pub fn describe(&self, flags: &TagFlags) -> BTreeMap<String, bool> {
        self.names
            .iter()
            .enumerate()
            .map(|(bit, name)| (name.clone(), flags.contains(bit)))
            .collect()
    }
}

/// Growable bit set, one bit per tag table entry.
///
/// The highest stored word is never zero, so equal sets compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagFlags {
    words: Vec<u64>,
}

impl TagFlags {
    pub fn from_bits<I: IntoIterator<Item = usize>>(bits: I) -> Self {
        let mut flags = Self::default();
        for bit in bits {
            flags.set(bit);
        }
        flags
    }

    pub fn set(&mut self, bit: usize) {
        let word = bit / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (bit % WORD_BITS);
    }

    pub fn contains(&self, bit: usize) -> bool {
        self.words
            .get(bit / WORD_BITS)
            .map_or(false, |w| w & (1u64 << (bit % WORD_BITS)) != 0)
    }

    pub fn union_with(&mut self, other: &TagFlags) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= *theirs;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, word)| {
            (0..WORD_BITS)
                .filter(move |b| word & (1u64 << b) != 0)
                .map(move |b| i * WORD_BITS + b)
        })
    }
}
