use crate::address::Address;
use crate::caip19::AssetId;
use crate::key::TokenKey;

/// Annotation for a token whose display symbol clashes with other tokens on
/// the same chain.
///
/// Distinct addresses sharing a symbol are distinct assets, so the registry
/// never merges or renames them; it records the clash so a UI can apply its
/// own disambiguation (the upstream list appends `_1`, `_2`, ...). `ordinal`
/// is 1-based and assigned in address order, so numbering is stable across
/// rebuilds and input reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolClash {
    pub ordinal: usize,
    /// How many tokens share this symbol on this chain, including this one.
    pub peers: usize,
}

/// The deduplicated, validated representation of a token.
///
/// Created once per unique key during a build, immutable afterwards, and
/// discarded only when the whole snapshot is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalToken {
    pub key: TokenKey,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub logo_uri: Option<String>,
    pub clash: Option<SymbolClash>,
}

impl CanonicalToken {
    pub fn chain_id(&self) -> u64 {
        self.key.chain_id
    }

    pub fn address(&self) -> Address {
        self.key.address
    }

    /// The canonical CAIP-19 identifier. Recomputed from the key, so it can
    /// never disagree with it.
    pub fn caip19(&self) -> AssetId {
        self.key.asset_id()
    }
}
