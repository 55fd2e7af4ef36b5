//! Wire models for the odds provider's JSON responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sport known to the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportInfo {
    pub key: String,
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub active: bool,
    #[serde(default)]
    pub has_outrights: bool,
}

/// Odds for a single outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub point: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Outcome {
    /// Convert American odds to decimal odds
    pub fn decimal_odds(&self) -> Decimal {
        let price = self.price;
        if price > 0.0 {
            Decimal::from_f64_retain((price / 100.0) + 1.0).unwrap_or(Decimal::ONE)
        } else {
            Decimal::from_f64_retain((100.0 / price.abs()) + 1.0).unwrap_or(Decimal::ONE)
        }
    }

    /// Convert to implied probability
    pub fn implied_probability(&self) -> Decimal {
        let decimal = self.decimal_odds();
        if decimal > Decimal::ZERO {
            Decimal::ONE / decimal
        } else {
            Decimal::ZERO
        }
    }
}

/// Market odds (h2h, spreads, totals, props, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOdds {
    pub key: String,
    #[serde(default)]
    pub last_update: Option<String>,
    pub outcomes: Vec<Outcome>,
}

/// Bookmaker odds for a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmakerOdds {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub last_update: Option<String>,
    pub markets: Vec<MarketOdds>,
}

/// Game event with odds from multiple bookmakers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerOdds>,
}

impl GameEvent {
    pub fn bookmaker(&self, bookmaker_key: &str) -> Option<&BookmakerOdds> {
        self.bookmakers.iter().find(|b| b.key == bookmaker_key)
    }

    /// Implied (home, away) probabilities for a bookmaker's moneyline
    pub fn moneyline_probabilities(&self, bookmaker_key: &str) -> Option<(Decimal, Decimal)> {
        let bookie = self.bookmaker(bookmaker_key)?;
        let market = bookie.markets.iter().find(|m| m.key == "h2h")?;

        let home = market
            .outcomes
            .iter()
            .find(|o| o.name == self.home_team)?
            .implied_probability();
        let away = market
            .outcomes
            .iter()
            .find(|o| o.name == self.away_team)?
            .implied_probability();
        Some((home, away))
    }
}

/// An event without odds, as returned by the events listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
}

/// Per-team score within a score event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamScore {
    pub name: String,
    pub score: String,
}

/// Live or final scores for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: String,
    pub completed: bool,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub scores: Option<Vec<TeamScore>>,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// A market available for an event, from the market-discovery endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableMarket {
    pub key: String,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// Markets a bookmaker currently prices for one event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmakerMarkets {
    pub key: String,
    #[serde(default)]
    pub markets: Vec<AvailableMarket>,
}

/// Market discovery response for one event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMarkets {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerMarkets>,
}

/// A participant (team or player) within a sport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub id: String,
    pub full_name: String,
}

/// Historical snapshot envelope returned by the historical endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSnapshot<T> {
    pub timestamp: String,
    #[serde(default)]
    pub previous_timestamp: Option<String>,
    #[serde(default)]
    pub next_timestamp: Option<String>,
    pub data: T,
}
