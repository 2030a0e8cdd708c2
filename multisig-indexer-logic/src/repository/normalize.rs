use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Raised when an address reaching the store boundary as a string is not
/// well-formed; names the offending field so the source is obvious.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {value}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
}

/// Lowercase storage form of an address. Typed inputs are already
/// well-formed, so this is pure normalisation.
pub fn address_string(address: Address) -> String {
    format!("{address:#x}")
}

/// Lowercase storage form of a 32-byte hash.
pub fn hash_string(hash: B256) -> String {
    format!("{hash:#x}")
}

/// Validates and normalises an address crossing the boundary as a string,
/// e.g. a persisted row read back from the store.
pub fn parse_address(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let lower = value.to_ascii_lowercase();
    match lower.strip_prefix("0x") {
        Some(hex) if hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()) => Ok(lower),
        _ => Err(ValidationError {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::collections::HashSet;

    #[test]
    fn normalisation_is_idempotent() {
        let mixed = "0xAbCdEF0123456789abcdef0123456789ABCDEF01";
        let once = parse_address("wallet_address", mixed).unwrap();
        let twice = parse_address("wallet_address", &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, mixed.to_ascii_lowercase());
    }

    #[test]
    fn equal_addresses_share_a_tracked_set_key() {
        let a: Address = "0xAbCdEF0123456789abcdef0123456789ABCDEF01"
            .parse()
            .unwrap();
        let b: Address = "0xabcdef0123456789abcdef0123456789abcdef01"
            .parse()
            .unwrap();
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn malformed_inputs_name_the_field() {
        let err = parse_address("owner_address", "0x1234").unwrap_err();
        assert_eq!(err.field, "owner_address");
        assert_eq!(err.value, "0x1234");
        assert!(parse_address("owner_address", "abcdef").is_err());
        assert!(parse_address("owner_address", &format!("0x{}", "g".repeat(40))).is_err());
    }

    #[test]
    fn storage_form_is_lowercase_hex() {
        let addr = address!("AbCdEF0123456789abcdef0123456789ABCDEF01");
        assert_eq!(
            address_string(addr),
            "0xabcdef0123456789abcdef0123456789abcdef01"
        );
    }
}
