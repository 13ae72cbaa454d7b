//! Accepted balance input shapes.
//!
//! Two JSON shapes are accepted and detected structurally:
//!
//! ```json
//! { "0xabc...": "1000", "0xdef...": 250 }
//! ```
//!
//! ```json
//! [ { "address": "0xabc...", "earnings": "0x3e8", "reasons": "airdrop,lp" } ]
//! ```
//!
//! The shape only matters until normalization; downstream stages see one
//! record type. A key repeated in the object form is kept as a separate row,
//! so the duplicate policy sees it like a repeated array entry.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use merkledrop_core::{parse_amount, Amount, DistributorError, Result};

/// Key under which serde_json passes an arbitrary-precision number to `visit_map`
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// An amount as it appears in input JSON.
///
/// Numbers keep their source text, so integers wider than 64 bits survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(serde_json::Number),
    Text(String),
}

impl AmountValue {
    /// Parse into an amount. `account` is only used for error context.
    pub fn to_amount(&self, account: &str) -> Result<Amount> {
        match self {
            Self::Text(text) => parse_amount(account, text),
            Self::Number(number) => parse_amount(account, &number.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for AmountValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(number) => Ok(Self::Number(number)),
            serde_json::Value::String(text) => Ok(Self::Text(text)),
            other => Err(de::Error::custom(format!(
                "amount must be a number or a string, got {}",
                other
            ))),
        }
    }
}

impl From<&str> for AmountValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AmountValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for AmountValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// One row of the array form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsEntry {
    pub address: String,
    #[serde(alias = "amount")]
    pub earnings: AmountValue,
    /// One tag or several joined with commas
    #[serde(default)]
    pub reasons: String,
}

impl EarningsEntry {
    pub fn new(
        address: impl Into<String>,
        earnings: impl Into<AmountValue>,
        reasons: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            earnings: earnings.into(),
            reasons: reasons.into(),
        }
    }
}

/// Raw balance input in either accepted shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceInput {
    /// Account -> amount rows, in document order; repeated keys are kept
    Map(Vec<(String, AmountValue)>),
    /// Rows with attribution reasons
    List(Vec<EarningsEntry>),
}

impl Serialize for BalanceInput {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Map(rows) => serializer.collect_map(rows.iter().map(|(k, v)| (k, v))),
            Self::List(rows) => rows.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BalanceInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BalanceInputVisitor;

        impl<'de> Visitor<'de> for BalanceInputVisitor {
            type Value = BalanceInput;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an account->amount object or an array of earnings entries")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(account) = map.next_key::<String>()? {
                    if account == JSON_NUMBER_TOKEN {
                        return Err(de::Error::invalid_type(de::Unexpected::Other("number"), &self));
                    }
                    rows.push((account, map.next_value::<AmountValue>()?));
                }
                Ok(BalanceInput::Map(rows))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element::<EarningsEntry>()? {
                    rows.push(entry);
                }
                Ok(BalanceInput::List(rows))
            }
        }

        deserializer.deserialize_any(BalanceInputVisitor)
    }
}

impl BalanceInput {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            DistributorError::MalformedInput(format!(
                "expected an account->amount object or an array of earnings entries: {}",
                e
            ))
        })
    }

    /// Parse an already-decoded document. A `serde_json::Value` object
    /// cannot hold repeated keys; use `from_json_str` when the raw text may
    /// contain them.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            DistributorError::MalformedInput(format!(
                "expected an account->amount object or an array of earnings entries: {}",
                e
            ))
        })
    }

    /// Map form from `(account, amount)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AmountValue>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Map(map) => map.len(),
            Self::List(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Map(_) => "map",
            Self::List(_) => "list",
        }
    }
}

/// Split a `reasons` string into tag names.
pub fn split_tags(reasons: &str) -> impl Iterator<Item = &str> {
    reasons.split(',').map(str::trim).filter(|t| !t.is_empty())
}
