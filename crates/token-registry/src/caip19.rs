use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::error::Caip19ParseError;

/// CAIP-19 asset identifier for an ERC-20 token:
/// `eip155:<chainId>/erc20:<address>`.
///
/// Output is bit-exact canonical form (decimal chain id, lowercase
/// `0x`-prefixed address). Input is tolerant in address casing only; the
/// `eip155` and `erc20` namespace segments must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId {
    pub chain_id: u64,
    pub address: Address,
}

impl AssetId {
    pub fn new(chain_id: u64, address: Address) -> Self {
        Self { chain_id, address }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eip155:{}/erc20:{}", self.chain_id, self.address)
    }
}

impl FromStr for AssetId {
    type Err = Caip19ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain_part, asset_part) = s
            .split_once('/')
            .ok_or(Caip19ParseError::MissingAssetSegment)?;

        let (namespace, reference) = chain_part
            .split_once(':')
            .ok_or(Caip19ParseError::MalformedChainSegment)?;
        if namespace != "eip155" {
            return Err(Caip19ParseError::UnsupportedNamespace(namespace.to_owned()));
        }
        let chain_id: u64 = reference
            .parse()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| Caip19ParseError::InvalidChainId(reference.to_owned()))?;

        let (asset_namespace, address) = asset_part
            .split_once(':')
            .ok_or(Caip19ParseError::MalformedAssetSegment)?;
        if asset_namespace != "erc20" {
            return Err(Caip19ParseError::UnsupportedAssetNamespace(
                asset_namespace.to_owned(),
            ));
        }
        let address: Address = address.parse()?;

        Ok(Self { chain_id, address })
    }
}
