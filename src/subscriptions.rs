/// Detection of recurring-service subscriptions in free text.
use std::collections::BTreeSet;

/// Catalog of recurring services recognised in report text and transaction
/// descriptions. Detection is exact (case-insensitive) substring matching
/// against these names; no fuzzy matching.
pub const SUBSCRIPTION_CATALOG: [&str; 16] = [
    "Spotify",
    "Netflix",
    "Amazon Prime",
    "Hotstar",
    "SonyLIV",
    "Apple Music",
    "YouTube Premium",
    "Gaana",
    "JioSaavn",
    "ALTBalaji",
    "Zee5",
    "Voot",
    "Prime Video",
    "Disney+",
    "Airtel Xstream",
    "Sun NXT",
];

/// Returns the catalog entries whose name appears anywhere in the text.
/// Each entry is tested once, so the result is deduplicated by construction.
pub fn detect_subscriptions(text: &str) -> BTreeSet<String> {
    let haystack = text.to_lowercase();
    SUBSCRIPTION_CATALOG
        .iter()
        .filter(|service| haystack.contains(&service.to_lowercase()))
        .map(|service| service.to_string())
        .collect()
}
