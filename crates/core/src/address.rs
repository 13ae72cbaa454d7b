//! EVM account parsing and display.

use crate::{Address, DistributorError, Result};

/// Parse a 20-byte account identifier.
///
/// Accepts 40 hex characters with or without a `0x` prefix. Single-case
/// input is taken as is; mixed-case input must be a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address> {
    let text = input.trim();
    let body = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if body.len() != 40 {
        return Err(DistributorError::invalid_address(
            input,
            format!("expected 40 hex characters, got {}", body.len()),
        ));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(body, &mut bytes)
        .map_err(|e| DistributorError::invalid_address(input, e.to_string()))?;
    let address = Address::from(bytes);

    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower {
        let expected = address.to_checksum(None);
        if &expected[2..] != body {
            return Err(DistributorError::invalid_address(
                input,
                format!("bad EIP-55 checksum, expected {}", expected),
            ));
        }
    }

    Ok(address)
}

/// EIP-55 mixed-case form, `0x` prefixed.
pub fn checksum_address(address: &Address) -> String {
    address.to_checksum(None)
}

/// Lowercase form, `0x` prefixed.
pub fn lowercase_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}
