use thiserror::Error;

use crate::address::Address;
use crate::key::TokenKey;

/// Unified error type for the registry library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("collision error: {0}")]
    Collision(#[from] CollisionError),

    #[error("caip19 parse error: {0}")]
    Caip19(#[from] Caip19ParseError),

    #[error("token list parse error: {0}")]
    TokenList(#[from] serde_json::Error),
}

/// Errors while parsing a 20-byte hex address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("expected 40 hex digits, got {0}")]
    BadLength(usize),

    #[error("invalid hex digit in address")]
    BadHex,
}

/// Errors while parsing a CAIP-19 identifier.
///
/// Returned to the caller on malformed lookup strings; never panics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Caip19ParseError {
    #[error("missing `/` between chain and asset segments")]
    MissingAssetSegment,

    #[error("malformed chain segment (expected `eip155:<chainId>`)")]
    MalformedChainSegment,

    #[error("unsupported chain namespace `{0}` (expected `eip155`)")]
    UnsupportedNamespace(String),

    #[error("invalid chain id `{0}`")]
    InvalidChainId(String),

    #[error("malformed asset segment (expected `erc20:<address>`)")]
    MalformedAssetSegment,

    #[error("unsupported asset namespace `{0}` (expected `erc20`)")]
    UnsupportedAssetNamespace(String),

    #[error("invalid asset address: {0}")]
    InvalidAddress(#[from] AddressParseError),
}

/// A raw record failed schema validation. Fatal to that record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        source: AddressParseError,
    },

    #[error("chain id must be a positive integer, got {chain_id}")]
    InvalidChainId { chain_id: i64 },

    #[error("decimals must be in 0..=255, got {decimals}")]
    DecimalsOutOfRange { decimals: i64 },

    #[error("name is empty after trimming")]
    EmptyName,

    #[error("symbol is empty after trimming")]
    EmptySymbol,
}

/// A record's own `caip19` field disagrees with its derived key. Fatal to
/// that record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("malformed caip19 field: {0}")]
    Malformed(#[from] Caip19ParseError),

    #[error("caip19 chain mismatch: record field says {found}, chainId is {expected}")]
    ChainMismatch { expected: u64, found: u64 },

    #[error("caip19 address mismatch: record field says {found}, address is {expected}")]
    AddressMismatch { expected: Address, found: Address },
}

/// Contradictory records for a single key. Fatal to that key only: the key
/// is excluded from the index and reported, the rest of the build proceeds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollisionError {
    #[error("conflicting decimals {observed:?} for {key} (input records {positions:?})")]
    DecimalsConflict {
        key: TokenKey,
        /// Distinct decimals values seen, ascending.
        observed: Vec<u8>,
        /// Positions of every contributing record in the raw input.
        positions: Vec<usize>,
    },
}

impl CollisionError {
    /// The key this collision excluded from the index.
    pub fn key(&self) -> TokenKey {
        match self {
            CollisionError::DecimalsConflict { key, .. } => *key,
        }
    }
}
