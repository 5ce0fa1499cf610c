use std::collections::HashMap;

use crate::address::Address;
use crate::caip19::AssetId;
use crate::error::Caip19ParseError;
use crate::key::TokenKey;
use crate::token::CanonicalToken;

/// Immutable, queryable token catalog.
///
/// Built once from resolved tokens; it has no mutation methods. "Updating"
/// the registry means building a new snapshot and atomically swapping a
/// reference to it (see `RegistryHandle`).
#[derive(Debug, Default)]
pub struct RegistryIndex {
    /// All tokens, sorted by (chainId, address).
    tokens: Vec<CanonicalToken>,
    by_key: HashMap<TokenKey, usize>,
    /// (chainId, lowercased symbol) → positions in `tokens`, ascending.
    symbols: HashMap<(u64, String), Vec<usize>>,
}

impl RegistryIndex {
    /// Build the index from resolved tokens. The resolver guarantees keys
    /// are unique at this point.
    pub(crate) fn from_tokens(mut tokens: Vec<CanonicalToken>) -> Self {
        tokens.sort_by_key(|t| t.key);

        let mut by_key = HashMap::with_capacity(tokens.len());
        let mut symbols: HashMap<(u64, String), Vec<usize>> = HashMap::new();
        for (i, token) in tokens.iter().enumerate() {
            by_key.insert(token.key, i);
            symbols
                .entry((token.key.chain_id, token.symbol.to_lowercase()))
                .or_default()
                .push(i);
        }

        Self {
            tokens,
            by_key,
            symbols,
        }
    }

    /// O(1) average lookup by key.
    pub fn get(&self, key: &TokenKey) -> Option<&CanonicalToken> {
        self.by_key.get(key).map(|&i| &self.tokens[i])
    }

    /// Lookup by chain id and address.
    pub fn by_key(&self, chain_id: u64, address: Address) -> Option<&CanonicalToken> {
        self.get(&TokenKey::new(chain_id, address))
    }

    /// All tokens carrying `symbol` on `chain_id`, case-insensitive, in
    /// address order. More than one hit is legitimate: distinct addresses
    /// sharing a symbol are distinct assets. The iterator is lazy and can be
    /// re-created by calling again.
    pub fn by_symbol<'a>(
        &'a self,
        chain_id: u64,
        symbol: &str,
    ) -> impl Iterator<Item = &'a CanonicalToken> + 'a {
        let hits = self
            .symbols
            .get(&(chain_id, symbol.to_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        hits.iter().map(move |&i| &self.tokens[i])
    }

    /// Parse a CAIP-19 identifier and look it up. Malformed input is a
    /// returned error, never a panic.
    pub fn by_caip19(&self, id: &str) -> Result<Option<&CanonicalToken>, Caip19ParseError> {
        let asset: AssetId = id.parse()?;
        Ok(self.by_key(asset.chain_id, asset.address))
    }

    /// All tokens on one chain, ordered by address.
    pub fn all_for_chain(&self, chain_id: u64) -> impl Iterator<Item = &CanonicalToken> {
        let start = self.tokens.partition_point(|t| t.key.chain_id < chain_id);
        let end = self.tokens.partition_point(|t| t.key.chain_id <= chain_id);
        self.tokens[start..end].iter()
    }

    /// All tokens, ordered by (chainId, address).
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
