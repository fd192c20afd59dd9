//! Input checks run before anything is sent to the wallet.

use std::str::FromStr;

use alloy::primitives::{Address, U256};

use super::ServiceResult;
use super::error::ServiceError;
use super::utils::to_base_units;

/// Validate a user-supplied address.
///
/// Accepts 40 hex digits with an optional `0x` prefix. Mixed-case input must
/// carry a valid EIP-55 checksum; all-lowercase and all-uppercase input is
/// taken as unchecksummed.
pub fn validate_address(input: &str) -> ServiceResult<Address> {
    if input.is_empty() {
        return Err(ServiceError::InvalidAddress(
            "Please fill all fields".to_string(),
        ));
    }

    let body = input.strip_prefix("0x").unwrap_or(input);
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ServiceError::InvalidAddress(format!(
            "'{input}' is not a 20-byte hex address"
        )));
    }

    let address = Address::from_str(body)
        .map_err(|e| ServiceError::InvalidAddress(format!("'{input}': {e}")))?;

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());

    if has_lower && has_upper && address.to_checksum(None)[2..] != *body {
        return Err(ServiceError::InvalidAddress(format!(
            "'{input}' has an invalid checksum"
        )));
    }

    Ok(address)
}

/// Validate a positive decimal amount and convert it to base units.
pub fn validate_amount(input: &str) -> ServiceResult<U256> {
    to_base_units(input)
}

/// Token URIs are opaque to the dapp; they only have to be present.
pub fn validate_token_uri(input: &str) -> ServiceResult<&str> {
    let uri = input.trim();
    if uri.is_empty() {
        return Err(ServiceError::MissingTokenUri);
    }
    Ok(uri)
}

/// Parse an NFT token id given in decimal.
pub fn validate_token_id(input: &str) -> ServiceResult<U256> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServiceError::InvalidAmount(format!(
            "'{input}' is not a token id"
        )));
    }

    U256::from_str_radix(input, 10)
        .map_err(|e| ServiceError::InvalidAmount(format!("'{input}' is not a token id: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_checksummed_address_should_work() {
        let address = validate_address(CHECKSUMMED).unwrap();
        assert_eq!(address.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn test_single_case_address_should_work() {
        let lower = CHECKSUMMED.to_lowercase();
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());

        assert_eq!(validate_address(&lower).unwrap(), validate_address(CHECKSUMMED).unwrap());
        assert_eq!(validate_address(&upper).unwrap(), validate_address(CHECKSUMMED).unwrap());
    }

    #[test]
    fn test_address_without_prefix_should_work() {
        assert!(validate_address(&CHECKSUMMED[2..]).is_ok());
    }

    #[test]
    fn test_bad_checksum_should_fail() {
        // flip the case of one letter
        let bad = CHECKSUMMED.replacen("dA6", "Da6", 1);
        let result = validate_address(&bad);
        assert!(matches!(result, Err(ServiceError::InvalidAddress(msg)) if msg.contains("checksum")));
    }

    #[test]
    fn test_malformed_address_should_fail() {
        for input in [
            "",
            "not-an-address",
            "0x",
            "0x1234",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA960455",
            "0xg8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            " 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
        ] {
            assert!(
                matches!(validate_address(input), Err(ServiceError::InvalidAddress(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_token_uri_should_be_present() {
        assert_eq!(validate_token_uri(" ipfs://tea/1 ").unwrap(), "ipfs://tea/1");
        assert_eq!(validate_token_uri("   "), Err(ServiceError::MissingTokenUri));
    }

    #[test]
    fn test_token_id_parsing() {
        assert_eq!(validate_token_id("0").unwrap(), U256::ZERO);
        assert_eq!(validate_token_id("42").unwrap(), U256::from(42u64));
        assert!(validate_token_id("-1").is_err());
        assert!(validate_token_id("one").is_err());
    }
}
