use crate::{DistributorError, Result, TagFlags};

pub use alloy_primitives::{Address, U256};

/// 32-byte hash digest (leaf, node or root)
pub type Digest = [u8; 32];

/// Token amount in the token's smallest unit (on-chain `uint256`)
pub type Amount = U256;

/// One recipient's entitlement after normalization.
///
/// After the merge step there is exactly one record per account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRecord {
    /// Recipient account
    pub account: Address,
    /// Entitled amount
    pub amount: Amount,
    /// Attribution tags, as bits of the build's tag table
    pub flags: TagFlags,
}

impl BalanceRecord {
    pub fn new(account: Address, amount: Amount, flags: TagFlags) -> Self {
        Self {
            account,
            amount,
            flags,
        }
    }
}

/// Parse an amount written as decimal digits or `0x`-prefixed hex.
///
/// `account` is only used for error context.
pub fn parse_amount(account: &str, input: &str) -> Result<Amount> {
    let invalid = |reason: &str| DistributorError::InvalidAmount {
        account: account.to_string(),
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let text = input.trim();
    if text.is_empty() {
        return Err(invalid("empty amount"));
    }
    if text.starts_with('-') {
        return Err(invalid("amount is negative"));
    }

    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex_digits) => {
            if hex_digits.is_empty() || !hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid("not a hex integer"));
            }
            (hex_digits, 16)
        }
        None => {
            if !text.bytes().all(|b| b.is_ascii_digit()) {
                let reason = if text.contains('.') || text.contains('e') || text.contains('E') {
                    "not an integer"
                } else {
                    "not a number"
                };
                return Err(invalid(reason));
            }
            (text, 10)
        }
    };

    // Digits are validated above, so the only remaining failure is width.
    U256::from_str_radix(digits, radix).map_err(|_| DistributorError::AmountOverflow {
        account: account.to_string(),
    })
}

/// `0x`-prefixed minimal hex, `0x0` for zero.
pub fn format_amount_hex(amount: &Amount) -> String {
    let bytes = amount.to_be_bytes::<32>();
    let encoded = hex::encode(bytes);
    let trimmed = encoded.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

/// `0x` + 64 lowercase hex characters.
pub fn format_digest(digest: &Digest) -> String {
    format!("0x{}", hex::encode(digest))
}

/// Parse a `0x` + 64 hex digest.
pub fn parse_digest(input: &str) -> Result<Digest> {
    let malformed = || DistributorError::MalformedInput(format!("invalid digest {:?}", input));
    let body = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(body).map_err(|_| malformed())?;
    bytes.try_into().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_amount() {
        assert_eq!(parse_amount("a", "150").unwrap(), U256::from(150u64));
        assert_eq!(parse_amount("a", " 7 ").unwrap(), U256::from(7u64));
        assert_eq!(parse_amount("a", "0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_hex_amount() {
        assert_eq!(parse_amount("a", "0x96").unwrap(), U256::from(150u64));
        assert_eq!(parse_amount("a", "0XfF").unwrap(), U256::from(255u64));
    }

    #[test]
    fn test_parse_amount_beyond_u128() {
        let big = "1000000000000000000000000000000000000000000";
        let parsed = parse_amount("a", big).unwrap();
        assert_eq!(parsed.to_string(), big);
    }

    #[test]
    fn test_parse_negative_amount_rejected() {
        let err = parse_amount("0xabc", "-5").unwrap_err();
        assert!(matches!(err, DistributorError::InvalidAmount { .. }));
    }

    #[test]
    fn test_parse_fractional_amount_rejected() {
        let err = parse_amount("a", "1.5").unwrap_err();
        match err {
            DistributorError::InvalidAmount { reason, .. } => assert_eq!(reason, "not an integer"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_amount_rejected() {
        assert!(matches!(
            parse_amount("a", "ten").unwrap_err(),
            DistributorError::InvalidAmount { .. }
        ));
        assert!(matches!(
            parse_amount("a", "").unwrap_err(),
            DistributorError::InvalidAmount { .. }
        ));
        assert!(matches!(
            parse_amount("a", "0x").unwrap_err(),
            DistributorError::InvalidAmount { .. }
        ));
        assert!(matches!(
            parse_amount("a", "0xzz").unwrap_err(),
            DistributorError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn test_parse_amount_overflow() {
        let too_big = format!("0x1{}", "0".repeat(64));
        let err = parse_amount("0xabc", &too_big).unwrap_err();
        assert_eq!(
            err,
            DistributorError::AmountOverflow {
                account: "0xabc".to_string()
            }
        );
    }

    #[test]
    fn test_format_amount_hex() {
        assert_eq!(format_amount_hex(&U256::ZERO), "0x0");
        assert_eq!(format_amount_hex(&U256::from(150u64)), "0x96");
        assert_eq!(format_amount_hex(&U256::from(4096u64)), "0x1000");
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = [0xABu8; 32];
        let text = format_digest(&digest);
        assert_eq!(text.len(), 66);
        assert_eq!(parse_digest(&text).unwrap(), digest);
        assert!(parse_digest("0x1234").is_err());
    }
}
