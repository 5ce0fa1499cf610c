use std::fmt;

use crate::address::Address;
use crate::caip19::AssetId;
use crate::error::KeyError;
use crate::validate::ValidatedRecord;

/// Canonical primary key for an on-chain asset.
///
/// Two records with equal keys refer to the same token and must collapse to
/// a single registry entry. Ordering is (chainId, address), which is also
/// the reproducible output order of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKey {
    pub chain_id: u64,
    pub address: Address,
}

impl TokenKey {
    pub fn new(chain_id: u64, address: Address) -> Self {
        Self { chain_id, address }
    }

    /// The canonical CAIP-19 identifier for this key.
    pub fn asset_id(&self) -> AssetId {
        AssetId::new(self.chain_id, self.address)
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

/// A validated record together with its derived key and its position in the
/// raw input (kept for error reports).
#[derive(Debug, Clone)]
pub struct KeyedRecord {
    pub position: usize,
    pub key: TokenKey,
    pub record: ValidatedRecord,
}

/// Derive the primary key for a validated record and cross-check the
/// record's own `caip19` field against the recomposed identifier.
///
/// Address comparison is case-insensitive (parsing already folds casing);
/// any other disagreement between the two identifiers is an error. Pure and
/// independent per record.
pub fn build_key(position: usize, record: ValidatedRecord) -> Result<KeyedRecord, KeyError> {
    let key = TokenKey::new(record.chain_id, record.address);

    let claimed: AssetId = record.caip19.parse()?;
    if claimed.chain_id != key.chain_id {
        return Err(KeyError::ChainMismatch {
            expected: key.chain_id,
            found: claimed.chain_id,
        });
    }
    if claimed.address != key.address {
        return Err(KeyError::AddressMismatch {
            expected: key.address,
            found: claimed.address,
        });
    }

    Ok(KeyedRecord {
        position,
        key,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Caip19ParseError;

    fn record(caip19: &str) -> ValidatedRecord {
        ValidatedRecord {
            address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".parse().unwrap(),
            chain_id: 1,
            decimals: 6,
            name: "Tether USD".to_owned(),
            symbol: "USDT".to_owned(),
            logo_uri: None,
            caip19: caip19.to_owned(),
        }
    }

    #[test]
    fn test_key_matches_consistent_caip19() {
        let keyed = build_key(
            0,
            record("eip155:1/erc20:0xdac17f958d2ee523a2206206994597c13d831ec7"),
        )
        .unwrap();
        assert_eq!(keyed.key.chain_id, 1);
        assert_eq!(
            keyed.key.asset_id().to_string(),
            "eip155:1/erc20:0xdac17f958d2ee523a2206206994597c13d831ec7"
        );
    }

    #[test]
    fn test_caip19_address_case_is_tolerated() {
        build_key(
            0,
            record("eip155:1/erc20:0xDAC17F958D2EE523A2206206994597C13D831EC7"),
        )
        .unwrap();
    }

    #[test]
    fn test_chain_mismatch_is_an_error() {
        let err = build_key(
            0,
            record("eip155:137/erc20:0xdac17f958d2ee523a2206206994597c13d831ec7"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            KeyError::ChainMismatch {
                expected: 1,
                found: 137
            }
        );
    }

    #[test]
    fn test_address_mismatch_is_an_error() {
        let err = build_key(
            0,
            record("eip155:1/erc20:0x2791bca1f2de4661ed88a30c99a7a9449aa84174"),
        )
        .unwrap_err();
        assert!(matches!(err, KeyError::AddressMismatch { .. }));
    }

    #[test]
    fn test_malformed_caip19_is_an_error() {
        let err = build_key(0, record("erc20:0xdac17f958d2ee523a2206206994597c13d831ec7"))
            .unwrap_err();
        assert_eq!(
            err,
            KeyError::Malformed(Caip19ParseError::MissingAssetSegment)
        );
    }
}
