use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributorError {
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid amount {input:?} for account {account}: {reason}")]
    InvalidAmount {
        account: String,
        input: String,
        reason: String,
    },

    #[error("Empty input: no balances to distribute")]
    EmptyInput,

    #[error("Duplicate account {account} with duplicate merging disabled")]
    DuplicateAccountConflict { account: String },

    #[error("Amount overflow for account {account}: value exceeds 256 bits")]
    AmountOverflow { account: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl DistributorError {
    pub(crate) fn invalid_address(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DistributorError>;
