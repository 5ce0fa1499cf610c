use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A raw token record, shaped exactly like one entry of the generated
/// multi-chain token list.
///
/// No invariants are guaranteed on input: addresses arrive in mixed case,
/// names and symbols may carry stray whitespace or upstream `_1`/`_2`
/// disambiguation suffixes, and the same (chainId, address) pair can appear
/// more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTokenRecord {
    pub address: String,

    #[serde(rename = "chainId")]
    pub chain_id: i64,

    pub decimals: i64,

    pub name: String,

    pub symbol: String,

    /// Logo URL; null or absent for many records.
    #[serde(rename = "logoURI")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,

    pub caip19: String,
}

/// A whole token list: the JSON array the upstream generator emits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenList {
    pub records: Vec<RawTokenRecord>,
}

impl TokenList {
    /// Parse a token list from its JSON source.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_wire_names() {
        let list = TokenList::from_json(
            r#"[
                {
                    "address": "0xdAC17F958D2ee523a2206206994597C13D831ec7",
                    "chainId": 1,
                    "decimals": 6,
                    "name": "Tether USD",
                    "symbol": "USDT",
                    "logoURI": "https://example.com/usdt.png",
                    "caip19": "eip155:1/erc20:0xdac17f958d2ee523a2206206994597c13d831ec7"
                },
                {
                    "address": "0x2791bca1f2de4661ed88a30c99a7a9449aa84174",
                    "chainId": 137,
                    "decimals": 6,
                    "name": "USD Coin (PoS)",
                    "symbol": "USDC",
                    "logoURI": null,
                    "caip19": "eip155:137/erc20:0x2791bca1f2de4661ed88a30c99a7a9449aa84174"
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.records[0].chain_id, 1);
        assert_eq!(
            list.records[0].logo_uri.as_deref(),
            Some("https://example.com/usdt.png")
        );
        assert_eq!(list.records[1].logo_uri, None);
    }

    #[test]
    fn test_from_json_missing_logo_field() {
        let list = TokenList::from_json(
            r#"[{
                "address": "0xaa",
                "chainId": 1,
                "decimals": 18,
                "name": "A",
                "symbol": "A",
                "caip19": "eip155:1/erc20:0xaa"
            }]"#,
        )
        .unwrap();
        assert_eq!(list.records[0].logo_uri, None);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(TokenList::from_json(r#"{"tokens": []}"#).is_err());
    }
}
