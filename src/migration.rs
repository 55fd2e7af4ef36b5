//! Key migration between legacy identifiers and canonical provider keys.
//!
//! Provider identifiers drift over time (bookmakers rebrand, market names get
//! renamed). This layer normalizes legacy keys onto the canonical keys the
//! catalog knows about, and reports drift so stale keys cached elsewhere can
//! be found. Unknown keys are passed through normalized with a warning rather
//! than rejected; callers needing strict validation should check
//! `catalog::is_valid_*_key` first.

use serde::Serialize;
use tracing::warn;

use crate::catalog;

/// Legacy market name -> canonical market key
const MARKET_ALIASES: &[(&str, &str)] = &[
    ("moneyline", "h2h"),
    ("ml", "h2h"),
    ("head2head", "h2h"),
    ("spread", "spreads"),
    ("point_spread", "spreads"),
    ("handicap", "spreads"),
    ("total", "totals"),
    ("over_under", "totals"),
    ("ou", "totals"),
    ("outright", "outrights"),
    ("futures", "outrights"),
];

/// Legacy bookmaker name -> canonical bookmaker key
const BOOKMAKER_ALIASES: &[(&str, &str)] = &[
    ("caesars", "williamhill_us"),
    ("william_hill", "williamhill_us"),
    ("williamhill us", "williamhill_us"),
    ("pointsbet", "pointsbetus"),
    ("barstool", "espnbet"),
    ("betonline", "betonlineag"),
    ("mybookie", "mybookieag"),
];

/// Markets served by the bulk odds endpoint. Everything else must go through
/// the per-event odds endpoint at 10x quota cost.
pub const FEATURED_MARKETS: &[&str] = &[
    "h2h",
    "spreads",
    "totals",
    "outrights",
    "h2h_lay",
    "outrights_lay",
];

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

fn lookup_alias(
    aliases: &'static [(&'static str, &'static str)],
    key: &str,
) -> Option<&'static str> {
    aliases
        .iter()
        .find(|(old, _)| *old == key)
        .map(|(_, canonical)| *canonical)
}

/// Translate a possibly-legacy market key to its canonical form.
///
/// Canonical keys pass through unchanged; known aliases are rewritten;
/// anything else is logged and returned normalized as-is.
pub fn migrate_market_key(legacy_key: &str) -> String {
    let normalized = normalize(legacy_key);
    if catalog::is_valid_market_key(&normalized) {
        return normalized;
    }
    if let Some(canonical) = lookup_alias(MARKET_ALIASES, &normalized) {
        return canonical.to_string();
    }
    warn!(key = %legacy_key, "unknown market key, passing through unmigrated");
    normalized
}

/// Translate a possibly-legacy bookmaker key to its canonical form
pub fn migrate_bookmaker_key(legacy_key: &str) -> String {
    let normalized = normalize(legacy_key);
    if catalog::is_valid_bookmaker_key(&normalized) {
        return normalized;
    }
    if let Some(canonical) = lookup_alias(BOOKMAKER_ALIASES, &normalized) {
        return canonical.to_string();
    }
    warn!(key = %legacy_key, "unknown bookmaker key, passing through unmigrated");
    normalized
}

pub fn migrate_market_keys(legacy_keys: &[String]) -> Vec<String> {
    legacy_keys.iter().map(|k| migrate_market_key(k)).collect()
}

pub fn migrate_bookmaker_keys(legacy_keys: &[String]) -> Vec<String> {
    legacy_keys
        .iter()
        .map(|k| migrate_bookmaker_key(k))
        .collect()
}

/// True iff the key is one of the fixed featured markets
pub fn is_featured_market(market_key: &str) -> bool {
    FEATURED_MARKETS.contains(&market_key)
}

/// True iff any market in the list must be fetched via the event odds endpoint
pub fn requires_event_odds_endpoint(market_keys: &[String]) -> bool {
    market_keys.iter().any(|k| !is_featured_market(k))
}

/// An alias rewrite that happened during a batch migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasUse {
    pub old: String,
    pub new: String,
}

/// Summary of a batch of legacy keys: how many were already canonical, which
/// aliases fired and which keys the catalog does not know about.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub total_keys: usize,
    pub migrated_keys: usize,
    pub unknown_keys: Vec<String>,
    pub aliases_used: Vec<AliasUse>,
}

fn generate_report(
    legacy_keys: &[String],
    aliases: &'static [(&'static str, &'static str)],
    is_canonical: impl Fn(&str) -> bool,
) -> MigrationReport {
    let mut report = MigrationReport {
        total_keys: legacy_keys.len(),
        ..Default::default()
    };

    for key in legacy_keys {
        let normalized = normalize(key);
        if is_canonical(&normalized) {
            report.migrated_keys += 1;
        } else if let Some(canonical) = lookup_alias(aliases, &normalized) {
            report.migrated_keys += 1;
            report.aliases_used.push(AliasUse {
                old: normalized,
                new: canonical.to_string(),
            });
        } else {
            report.unknown_keys.push(normalized);
        }
    }

    report
}

/// Classify a batch of legacy market keys without rewriting anything
pub fn market_migration_report(legacy_keys: &[String]) -> MigrationReport {
    generate_report(legacy_keys, MARKET_ALIASES, catalog::is_valid_market_key)
}

/// Classify a batch of legacy bookmaker keys without rewriting anything
pub fn bookmaker_migration_report(legacy_keys: &[String]) -> MigrationReport {
    generate_report(
        legacy_keys,
        BOOKMAKER_ALIASES,
        catalog::is_valid_bookmaker_key,
    )
}
