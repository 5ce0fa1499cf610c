/// Known chain ids → human-readable network names, for report and UI
/// rendering. Unknown chains are still fully supported by the registry;
/// they just have no friendly name.
pub fn chain_name(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("Ethereum"),
        10 => Some("Optimism"),
        56 => Some("BNB Chain"),
        100 => Some("Gnosis"),
        137 => Some("Polygon"),
        250 => Some("Fantom"),
        324 => Some("zkSync Era"),
        8453 => Some("Base"),
        42161 => Some("Arbitrum One"),
        42170 => Some("Arbitrum Nova"),
        43114 => Some("Avalanche"),
        59144 => Some("Linea"),
        534352 => Some("Scroll"),
        7777777 => Some("Zora"),
        _ => None,
    }
}

/// Display label for a chain: the friendly name when known, `chain <id>`
/// otherwise.
pub fn chain_label(chain_id: u64) -> String {
    match chain_name(chain_id) {
        Some(name) => name.to_owned(),
        None => format!("chain {chain_id}"),
    }
}
