//! Canonical reference data for the odds provider.
//!
//! Three static tables (regions, bookmakers, markets) are embedded at build
//! time and parsed into typed collections. They are the single source of
//! truth for key validity: the migration layer and request validation both
//! test membership against these sets.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const REGIONS_CSV: &str = include_str!("../data/regions.csv");
const BOOKMAKERS_CSV: &str = include_str!("../data/bookmakers.csv");
const MARKETS_CSV: &str = include_str!("../data/markets.csv");

/// A provider region (key + human-readable description)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub key: String,
    pub description: String,
}

/// A bookmaker, grouped under a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub region_key: String,
    pub bookmaker_key: String,
    pub bookmaker_name: String,
    pub notes: Option<String>,
}

/// Category a market belongs to. Determines which endpoint family the market
/// must be requested through and its quota cost multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCategory {
    Featured,
    PlayerProps,
    GamePeriod,
    Alternates,
    TeamProps,
    Unknown,
}

impl MarketCategory {
    pub fn from_key(key: &str) -> Self {
        match key {
            "featured" => MarketCategory::Featured,
            "player_props" => MarketCategory::PlayerProps,
            "game_period" => MarketCategory::GamePeriod,
            "alternates" => MarketCategory::Alternates,
            "team_props" => MarketCategory::TeamProps,
            _ => MarketCategory::Unknown,
        }
    }

    /// Featured markets go through the bulk odds endpoint; everything else
    /// must use the per-event odds endpoint.
    pub fn requires_event_endpoint(&self) -> bool {
        !matches!(self, MarketCategory::Featured)
    }

    /// Quota multiplier relative to a bulk odds call
    pub fn cost_multiplier(&self) -> u64 {
        if self.requires_event_endpoint() {
            10
        } else {
            1
        }
    }
}

/// A betting market known to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub category: MarketCategory,
    pub sport_group: String,
    pub market_key: String,
    pub market_name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
}

/// Split one delimited row into trimmed, unquoted fields.
///
/// Naive comma split: the embedded tables never put commas inside fields.
/// Missing trailing columns degrade to empty strings rather than erroring.
fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|field| {
            let trimmed = field.trim();
            trimmed
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(trimmed)
                .to_string()
        })
        .collect()
}

fn field(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

fn optional_field(row: &[String], index: usize) -> Option<String> {
    row.get(index).filter(|s| !s.is_empty()).cloned()
}

fn data_rows(source: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    source
        .lines()
        .skip(1) // header row
        .filter(|line| !line.trim().is_empty())
        .map(split_row)
}

/// Parse the region table from the embedded source text
pub fn load_regions() -> Vec<Region> {
    data_rows(REGIONS_CSV)
        .map(|row| Region {
            key: field(&row, 0),
            description: field(&row, 1),
        })
        .collect()
}

/// Parse the bookmaker table from the embedded source text
pub fn load_bookmakers() -> Vec<Bookmaker> {
    data_rows(BOOKMAKERS_CSV)
        .map(|row| Bookmaker {
            region_key: field(&row, 0),
            bookmaker_key: field(&row, 1),
            bookmaker_name: field(&row, 2),
            notes: optional_field(&row, 3),
        })
        .collect()
}

/// Parse the market table from the embedded source text
pub fn load_markets() -> Vec<Market> {
    data_rows(MARKETS_CSV)
        .map(|row| Market {
            category: MarketCategory::from_key(&field(&row, 0)),
            sport_group: field(&row, 1),
            market_key: field(&row, 2),
            market_name: field(&row, 3),
            description: optional_field(&row, 4),
            notes: optional_field(&row, 5),
        })
        .collect()
}

/// Pre-loaded region snapshot (parsed once per process)
pub fn regions() -> &'static [Region] {
    static REGIONS: OnceLock<Vec<Region>> = OnceLock::new();
    REGIONS.get_or_init(load_regions)
}

/// Pre-loaded bookmaker snapshot
pub fn bookmakers() -> &'static [Bookmaker] {
    static BOOKMAKERS: OnceLock<Vec<Bookmaker>> = OnceLock::new();
    BOOKMAKERS.get_or_init(load_bookmakers)
}

/// Pre-loaded market snapshot
pub fn markets() -> &'static [Market] {
    static MARKETS: OnceLock<Vec<Market>> = OnceLock::new();
    MARKETS.get_or_init(load_markets)
}

pub fn bookmakers_by_region(region_key: &str) -> Vec<&'static Bookmaker> {
    bookmakers()
        .iter()
        .filter(|b| b.region_key == region_key)
        .collect()
}

pub fn markets_by_category(category: MarketCategory) -> Vec<&'static Market> {
    markets().iter().filter(|m| m.category == category).collect()
}

/// Markets for a sport group. The sentinel groups "All" and "Exchanges" match
/// every query so cross-sport markets are always included.
pub fn markets_by_sport_group(sport_group: &str) -> Vec<&'static Market> {
    markets()
        .iter()
        .filter(|m| {
            m.sport_group == sport_group || m.sport_group == "All" || m.sport_group == "Exchanges"
        })
        .collect()
}

pub fn featured_markets() -> Vec<&'static Market> {
    markets_by_category(MarketCategory::Featured)
}

pub fn player_prop_markets() -> Vec<&'static Market> {
    markets_by_category(MarketCategory::PlayerProps)
}

pub fn game_period_markets() -> Vec<&'static Market> {
    markets_by_category(MarketCategory::GamePeriod)
}

pub fn is_valid_region_key(key: &str) -> bool {
    regions().iter().any(|r| r.key == key)
}

pub fn is_valid_bookmaker_key(key: &str) -> bool {
    bookmakers().iter().any(|b| b.bookmaker_key == key)
}

pub fn is_valid_market_key(key: &str) -> bool {
    markets().iter().any(|m| m.market_key == key)
}

/// Human-readable name for a region key; falls back to the key itself
pub fn region_display_name(key: &str) -> String {
    regions()
        .iter()
        .find(|r| r.key == key)
        .map(|r| r.description.clone())
        .unwrap_or_else(|| key.to_string())
}

/// Human-readable name for a bookmaker key; falls back to the key itself
pub fn bookmaker_display_name(key: &str) -> String {
    bookmakers()
        .iter()
        .find(|b| b.bookmaker_key == key)
        .map(|b| b.bookmaker_name.clone())
        .unwrap_or_else(|| key.to_string())
}

/// Human-readable name for a market key; falls back to the key itself
pub fn market_display_name(key: &str) -> String {
    markets()
        .iter()
        .find(|m| m.market_key == key)
        .map(|m| m.market_name.clone())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_load() {
        assert_eq!(load_regions().len(), 5);
        assert!(load_bookmakers().len() >= 25);
        assert!(load_markets().len() >= 30);
    }

    #[test]
    fn test_split_row_trims_and_unquotes() {
        let row = split_row(r#" us , "United States" ,extra "#);
        assert_eq!(row, vec!["us", "United States", "extra"]);
    }

    #[test]
    fn test_short_rows_degrade_to_empty_fields() {
        let row = split_row("us");
        assert_eq!(field(&row, 0), "us");
        assert_eq!(field(&row, 1), "");
        assert_eq!(optional_field(&row, 3), None);
    }

    #[test]
    fn test_region_lookup() {
        assert!(is_valid_region_key("us"));
        assert!(is_valid_region_key("eu"));
        assert!(!is_valid_region_key("mars"));
        assert_eq!(region_display_name("uk"), "United Kingdom");
    }

    #[test]
    fn test_bookmakers_by_region() {
        let us_books = bookmakers_by_region("us");
        assert!(us_books.iter().any(|b| b.bookmaker_key == "draftkings"));
        assert!(us_books.iter().all(|b| b.region_key == "us"));
        assert!(bookmakers_by_region("nowhere").is_empty());
    }

    #[test]
    fn test_markets_by_category() {
        let featured = featured_markets();
        assert!(featured.iter().any(|m| m.market_key == "h2h"));
        assert!(featured.iter().any(|m| m.market_key == "h2h_lay"));
        assert!(featured
            .iter()
            .all(|m| m.category == MarketCategory::Featured));

        let props = player_prop_markets();
        assert!(props.iter().any(|m| m.market_key == "player_points"));
        assert!(game_period_markets()
            .iter()
            .any(|m| m.market_key == "h2h_q1"));
    }

    #[test]
    fn test_sport_group_includes_sentinels() {
        let basketball = markets_by_sport_group("Basketball");
        // Exact group plus the "All" and "Exchanges" sentinel groups.
        assert!(basketball.iter().any(|m| m.market_key == "player_points"));
        assert!(basketball.iter().any(|m| m.market_key == "h2h"));
        assert!(basketball.iter().any(|m| m.market_key == "h2h_lay"));
        assert!(!basketball.iter().any(|m| m.market_key == "player_pass_tds"));
    }

    #[test]
    fn test_display_name_falls_back_to_key() {
        assert_eq!(market_display_name("not_a_market"), "not_a_market");
        assert_eq!(bookmaker_display_name(""), "");
        assert_eq!(region_display_name("zz"), "zz");
    }

    #[test]
    fn test_category_drives_endpoint_and_cost_together() {
        for market in markets() {
            let category = market.category;
            if category.requires_event_endpoint() {
                assert_eq!(category.cost_multiplier(), 10);
            } else {
                assert_eq!(category.cost_multiplier(), 1);
            }
        }
    }
}
