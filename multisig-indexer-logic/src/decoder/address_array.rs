use alloy::primitives::Address;
use thiserror::Error;

/// Hard cap on the declared length of a returned owner/guardian set; a
/// larger value means a garbage response, not a real wallet.
pub const MAX_ADDRESSES: usize = 1000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressArrayError {
    #[error("address array response is not 0x-prefixed hex: {0}")]
    NotHex(String),
    #[error("address array declares {0} entries, limit is {MAX_ADDRESSES}")]
    TooLong(usize),
    #[error("address array truncated: expected {expected} hex chars, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Decodes the ABI encoding of a dynamic `address[]` return value: a
/// 32-byte offset word, a 32-byte length word, then one 32-byte slot per
/// entry holding the 20-byte address in its low bytes.
pub fn decode_address_array(raw: &str) -> Result<Vec<Address>, AddressArrayError> {
    let hex = raw
        .strip_prefix("0x")
        .ok_or_else(|| AddressArrayError::NotHex(raw.to_string()))?;
    if hex.len() < 128 {
        return Err(AddressArrayError::Truncated {
            expected: 128,
            actual: hex.len(),
        });
    }

    let bytes =
        alloy::hex::decode(hex).map_err(|_| AddressArrayError::NotHex(raw.to_string()))?;

    // any length that does not fit the low 8 bytes of the word is far past
    // the cap anyway
    let length_word = &bytes[32..64];
    if length_word[..24].iter().any(|b| *b != 0) {
        return Err(AddressArrayError::TooLong(usize::MAX));
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&length_word[24..]);
    let length = u64::from_be_bytes(len_bytes) as usize;
    if length > MAX_ADDRESSES {
        return Err(AddressArrayError::TooLong(length));
    }

    let expected = 128 + 64 * length;
    if hex.len() < expected {
        return Err(AddressArrayError::Truncated {
            expected,
            actual: hex.len(),
        });
    }

    let mut addresses = Vec::with_capacity(length);
    for i in 0..length {
        let slot = 64 + 32 * i;
        addresses.push(Address::from_slice(&bytes[slot + 12..slot + 32]));
    }
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{primitives::address, sol_types::SolValue};

    fn encode(addresses: &[Address]) -> String {
        format!("0x{}", alloy::hex::encode(addresses.to_vec().abi_encode()))
    }

    #[test]
    fn round_trips_well_formed_arrays() {
        for addresses in [
            vec![],
            vec![address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")],
            vec![
                address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
                address!("cccccccccccccccccccccccccccccccccccccccc"),
                address!("dddddddddddddddddddddddddddddddddddddddd"),
            ],
        ] {
            assert_eq!(decode_address_array(&encode(&addresses)).unwrap(), addresses);
        }
    }

    #[test]
    fn rejects_oversized_length() {
        let mut payload = vec![0u8; 64];
        payload[31] = 0x20;
        payload[62] = 0x03;
        payload[63] = 0xe9; // length 1001
        let raw = format!("0x{}", alloy::hex::encode(payload));
        assert_eq!(
            decode_address_array(&raw),
            Err(AddressArrayError::TooLong(1001))
        );
    }

    #[test]
    fn rejects_truncated_payload() {
        let full = encode(&[
            address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            address!("cccccccccccccccccccccccccccccccccccccccc"),
        ]);
        let truncated = &full[..full.len() - 64];
        assert!(matches!(
            decode_address_array(truncated),
            Err(AddressArrayError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_non_hex_input() {
        assert!(matches!(
            decode_address_array("deadbeef"),
            Err(AddressArrayError::NotHex(_))
        ));
        let not_hex = format!("0x{}", "zz".repeat(64));
        assert!(matches!(
            decode_address_array(&not_hex),
            Err(AddressArrayError::NotHex(_))
        ));
    }
}
