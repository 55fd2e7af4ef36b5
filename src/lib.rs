//! oddsline: sports odds aggregation client.
//!
//! Wraps the odds provider's HTTP API with quota cost estimation, single-slot
//! rate limiting, TTL response caching and retry/backoff on the provider's
//! frequency limit. Canonical reference data (regions, bookmakers, markets)
//! is embedded and backs key validation and legacy-key migration.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod migration;
pub mod types;

pub use api::error::{ApiErrorCode, OddsApiError};
pub use api::quota::QuotaSnapshot;
pub use api::{ApiResult, OddsApiClient, OddsFormat, OddsQuery};
pub use catalog::{Bookmaker, Market, MarketCategory, Region};
pub use config::OddsConfig;
pub use error::{OddsLineError, Result};
pub use migration::MigrationReport;
