use crate::address::Address;
use crate::error::ValidationError;
use crate::record::RawTokenRecord;

/// A record that passed schema validation, with fields canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub address: Address,
    pub chain_id: u64,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub logo_uri: Option<String>,
    /// The record's own caip19 field, kept verbatim for the key builder's
    /// cross-check.
    pub caip19: String,
}

/// Validate one raw record. Pure.
///
/// Recoverable issues are normalized, not rejected: whitespace around names
/// and symbols is trimmed, address casing is folded, an empty logoURI string
/// becomes `None`. Structural problems fail with the offending field.
pub fn validate(raw: &RawTokenRecord) -> Result<ValidatedRecord, ValidationError> {
    let address: Address =
        raw.address
            .trim()
            .parse()
            .map_err(|source| ValidationError::InvalidAddress {
                address: raw.address.clone(),
                source,
            })?;

    let chain_id = u64::try_from(raw.chain_id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ValidationError::InvalidChainId {
            chain_id: raw.chain_id,
        })?;

    let decimals = u8::try_from(raw.decimals).map_err(|_| ValidationError::DecimalsOutOfRange {
        decimals: raw.decimals,
    })?;

    let name = raw.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let symbol = raw.symbol.trim();
    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    let logo_uri = raw
        .logo_uri
        .as_deref()
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .map(str::to_owned);

    Ok(ValidatedRecord {
        address,
        chain_id,
        decimals,
        name: name.to_owned(),
        symbol: symbol.to_owned(),
        logo_uri,
        caip19: raw.caip19.trim().to_owned(),
    })
}
