use std::fmt;
use std::str::FromStr;

use tiny_keccak::{Hasher, Keccak};

use crate::error::AddressParseError;

/// A 20-byte EVM contract address.
///
/// Parsing is tolerant: any hex casing, with or without a `0x` prefix.
/// `Display` always renders the canonical lowercase `0x`-prefixed form,
/// which is also the form used inside CAIP-19 identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case checksum rendering, for display surfaces that want
    /// the conventional checksummed form. Lookups always use lowercase.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let mut keccak = Keccak::v256();
        let mut digest = [0u8; 32];
        keccak.update(lower.as_bytes());
        keccak.finalize(&mut digest);

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (digest[i / 2] >> (4 * (1 - i % 2))) & 0xf;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(AddressParseError::BadLength(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressParseError::BadHex)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[test]
    fn test_parse_is_case_insensitive() {
        let mixed: Address = USDT.parse().unwrap();
        let lower: Address = USDT.to_lowercase().parse().unwrap();
        let upper: Address = "0xDAC17F958D2EE523A2206206994597C13D831EC7".parse().unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(mixed, upper);
    }

    #[test]
    fn test_parse_without_prefix() {
        let with_prefix: Address = USDT.parse().unwrap();
        let without: Address = "dac17f958d2ee523a2206206994597c13d831ec7".parse().unwrap();
        assert_eq!(with_prefix, without);
    }

    #[test]
    fn test_display_is_lowercase_prefixed() {
        let addr: Address = USDT.parse().unwrap();
        assert_eq!(
            addr.to_string(),
            "0xdac17f958d2ee523a2206206994597c13d831ec7"
        );
    }

    #[test]
    fn test_rejects_bad_length() {
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(AddressParseError::BadLength(4))
        );
    }

    #[test]
    fn test_rejects_non_hex() {
        let result = format!("0x{}", "zz".repeat(20)).parse::<Address>();
        assert!(matches!(result, Err(AddressParseError::BadHex)));
    }

    #[test]
    fn test_eip55_checksum() {
        let addr: Address = USDT.to_lowercase().parse().unwrap();
        assert_eq!(addr.to_checksum(), USDT);
    }
}
