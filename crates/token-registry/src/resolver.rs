use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::CollisionError;
use crate::key::{KeyedRecord, TokenKey};
use crate::token::{CanonicalToken, SymbolClash};
use crate::validate::ValidatedRecord;

/// Outcome of collision resolution: one canonical token per surviving key,
/// plus every key that had to be excluded.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Sorted by (chainId, address).
    pub tokens: Vec<CanonicalToken>,
    pub errors: Vec<CollisionError>,
}

/// Collapse a multiset of keyed records into one canonical token per key.
///
/// Groups whose records only differ cosmetically keep a deterministically
/// chosen survivor. Groups that disagree on decimals are excluded wholesale:
/// decimals is a fixed on-chain property, so two values for one key mean at
/// least one record is wrong and there is no basis for picking. Exclusion is
/// per key; unrelated keys are unaffected.
///
/// Output never depends on input order.
pub fn resolve(records: Vec<KeyedRecord>) -> Resolution {
    // BTreeMap keeps key-group iteration in (chainId, address) order.
    let mut groups: BTreeMap<TokenKey, Vec<KeyedRecord>> = BTreeMap::new();
    for keyed in records {
        groups.entry(keyed.key).or_default().push(keyed);
    }

    let mut resolution = Resolution::default();
    for (key, group) in groups {
        match resolve_group(key, group) {
            Ok(Some(token)) => resolution.tokens.push(token),
            Ok(None) => {}
            Err(err) => {
                debug!(key = %key, error = %err, "excluding key from index");
                resolution.errors.push(err);
            }
        }
    }

    annotate_symbol_clashes(&mut resolution.tokens);
    resolution
}

/// Resolve one key group. `Ok(None)` only for an empty group, which cannot
/// occur for groups produced by `resolve`.
fn resolve_group(
    key: TokenKey,
    group: Vec<KeyedRecord>,
) -> Result<Option<CanonicalToken>, CollisionError> {
    let mut observed: Vec<u8> = group.iter().map(|k| k.record.decimals).collect();
    observed.sort_unstable();
    observed.dedup();
    if observed.len() > 1 {
        let mut positions: Vec<usize> = group.iter().map(|k| k.position).collect();
        positions.sort_unstable();
        return Err(CollisionError::DecimalsConflict {
            key,
            observed,
            positions,
        });
    }

    let chosen = group
        .into_iter()
        .map(|k| k.record)
        .min_by(prefer_complete);
    let Some(record) = chosen else {
        return Ok(None);
    };

    Ok(Some(CanonicalToken {
        key,
        decimals: record.decimals,
        name: record.name,
        symbol: record.symbol,
        logo_uri: record.logo_uri,
        clash: None,
    }))
}

/// Deterministic survivor order for cosmetic duplicates of one key: prefer a
/// record with a logoURI, then the lexicographically first symbol, name and
/// logoURI. Never "last record wins" by array position, which would stop
/// being reproducible the moment upstream ordering changes.
fn prefer_complete(a: &ValidatedRecord, b: &ValidatedRecord) -> Ordering {
    (a.logo_uri.is_none(), &a.symbol, &a.name, &a.logo_uri).cmp(&(
        b.logo_uri.is_none(),
        &b.symbol,
        &b.name,
        &b.logo_uri,
    ))
}

/// Mark every token whose symbol (case-insensitive) appears on more than one
/// address of the same chain. Annotation only; symbols are never rewritten
/// here. Ordinals follow address order, which `tokens` is already sorted by.
fn annotate_symbol_clashes(tokens: &mut [CanonicalToken]) {
    let mut by_symbol: HashMap<(u64, String), Vec<usize>> = HashMap::new();
    for (i, token) in tokens.iter().enumerate() {
        by_symbol
            .entry((token.key.chain_id, token.symbol.to_lowercase()))
            .or_default()
            .push(i);
    }

    for positions in by_symbol.into_values() {
        if positions.len() < 2 {
            continue;
        }
        let peers = positions.len();
        for (ordinal, i) in positions.into_iter().enumerate() {
            tokens[i].clash = Some(SymbolClash {
                ordinal: ordinal + 1,
                peers,
            });
        }
    }
}
