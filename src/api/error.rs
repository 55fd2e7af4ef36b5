//! Provider error taxonomy.
//!
//! The provider reports failures as a JSON `{code, message}` body with a
//! non-2xx status. Each known code maps to a user-facing message and a
//! developer remediation hint. Exactly one code (the frequency limit) is
//! retryable; every other failure is terminal for the current call.

use serde::Deserialize;
use thiserror::Error;

use crate::error::OddsLineError;

/// Closed set of provider error codes, plus a catch-all for anything
/// unrecognized (including network-level and parse failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    MissingKey,
    InvalidKey,
    DisabledKey,
    ExpiredKey,
    OutOfUsageCredits,
    ExceededFreqLimit,
    UnknownSport,
    InactiveSport,
    UnknownRegion,
    InvalidRegion,
    UnknownMarket,
    InvalidMarket,
    MarketNotSupported,
    UnknownBookmaker,
    InvalidBookmaker,
    InvalidEventId,
    EventNotFound,
    EventEnded,
    InvalidDateFormat,
    InvalidCommenceTimeFrom,
    InvalidCommenceTimeTo,
    DateOutOfRange,
    InvalidOddsFormat,
    InvalidDaysFrom,
    HistoricalNotEntitled,
    PlanRestriction,
    TooManyEventIds,
    MissingMarkets,
    MissingRegions,
    InternalError,
    ServiceUnavailable,
    UnknownError,
}

/// Every known code except the catch-all, for table-driven checks
pub const KNOWN_CODES: &[ApiErrorCode] = &[
    ApiErrorCode::MissingKey,
    ApiErrorCode::InvalidKey,
    ApiErrorCode::DisabledKey,
    ApiErrorCode::ExpiredKey,
    ApiErrorCode::OutOfUsageCredits,
    ApiErrorCode::ExceededFreqLimit,
    ApiErrorCode::UnknownSport,
    ApiErrorCode::InactiveSport,
    ApiErrorCode::UnknownRegion,
    ApiErrorCode::InvalidRegion,
    ApiErrorCode::UnknownMarket,
    ApiErrorCode::InvalidMarket,
    ApiErrorCode::MarketNotSupported,
    ApiErrorCode::UnknownBookmaker,
    ApiErrorCode::InvalidBookmaker,
    ApiErrorCode::InvalidEventId,
    ApiErrorCode::EventNotFound,
    ApiErrorCode::EventEnded,
    ApiErrorCode::InvalidDateFormat,
    ApiErrorCode::InvalidCommenceTimeFrom,
    ApiErrorCode::InvalidCommenceTimeTo,
    ApiErrorCode::DateOutOfRange,
    ApiErrorCode::InvalidOddsFormat,
    ApiErrorCode::InvalidDaysFrom,
    ApiErrorCode::HistoricalNotEntitled,
    ApiErrorCode::PlanRestriction,
    ApiErrorCode::TooManyEventIds,
    ApiErrorCode::MissingMarkets,
    ApiErrorCode::MissingRegions,
    ApiErrorCode::InternalError,
    ApiErrorCode::ServiceUnavailable,
];

impl ApiErrorCode {
    /// Parse a provider code string; anything unrecognized is UnknownError
    pub fn parse(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "MISSING_KEY" => Self::MissingKey,
            "INVALID_KEY" => Self::InvalidKey,
            "DISABLED_KEY" => Self::DisabledKey,
            "EXPIRED_KEY" => Self::ExpiredKey,
            "OUT_OF_USAGE_CREDITS" => Self::OutOfUsageCredits,
            "EXCEEDED_FREQ_LIMIT" => Self::ExceededFreqLimit,
            "UNKNOWN_SPORT" => Self::UnknownSport,
            "INACTIVE_SPORT" => Self::InactiveSport,
            "UNKNOWN_REGION" => Self::UnknownRegion,
            "INVALID_REGION" => Self::InvalidRegion,
            "UNKNOWN_MARKET" => Self::UnknownMarket,
            "INVALID_MARKET" => Self::InvalidMarket,
            "MARKET_NOT_SUPPORTED" => Self::MarketNotSupported,
            "UNKNOWN_BOOKMAKER" => Self::UnknownBookmaker,
            "INVALID_BOOKMAKER" => Self::InvalidBookmaker,
            "INVALID_EVENT_ID" => Self::InvalidEventId,
            "EVENT_NOT_FOUND" => Self::EventNotFound,
            "EVENT_ENDED" => Self::EventEnded,
            "INVALID_DATE_FORMAT" => Self::InvalidDateFormat,
            "INVALID_COMMENCE_TIME_FROM" => Self::InvalidCommenceTimeFrom,
            "INVALID_COMMENCE_TIME_TO" => Self::InvalidCommenceTimeTo,
            "DATE_OUT_OF_RANGE" => Self::DateOutOfRange,
            "INVALID_ODDS_FORMAT" => Self::InvalidOddsFormat,
            "INVALID_DAYS_FROM" => Self::InvalidDaysFrom,
            "HISTORICAL_NOT_ENTITLED" => Self::HistoricalNotEntitled,
            "PLAN_RESTRICTION" => Self::PlanRestriction,
            "TOO_MANY_EVENT_IDS" => Self::TooManyEventIds,
            "MISSING_MARKETS" => Self::MissingMarkets,
            "MISSING_REGIONS" => Self::MissingRegions,
            "INTERNAL_ERROR" => Self::InternalError,
            "SERVICE_UNAVAILABLE" => Self::ServiceUnavailable,
            _ => Self::UnknownError,
        }
    }

    /// Only the provider frequency limit is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExceededFreqLimit)
    }

    /// Message safe to surface to end users
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingKey | Self::InvalidKey | Self::DisabledKey | Self::ExpiredKey => {
                "Odds service is not configured correctly. Please contact support."
            }
            Self::OutOfUsageCredits => {
                "The odds data quota is used up for this period. Odds will refresh when the quota resets."
            }
            Self::ExceededFreqLimit => {
                "Odds are being requested too quickly. Please wait a moment and try again."
            }
            Self::UnknownSport | Self::InactiveSport => {
                "Odds are not available for this sport right now."
            }
            Self::UnknownRegion | Self::InvalidRegion | Self::MissingRegions => {
                "Odds are not available for the selected region."
            }
            Self::UnknownMarket
            | Self::InvalidMarket
            | Self::MarketNotSupported
            | Self::MissingMarkets => "This bet type is not available for the selected game.",
            Self::UnknownBookmaker | Self::InvalidBookmaker => {
                "The selected sportsbook is not available."
            }
            Self::InvalidEventId
            | Self::EventNotFound
            | Self::EventEnded
            | Self::TooManyEventIds => "This game could not be found. It may have already ended.",
            Self::InvalidDateFormat
            | Self::InvalidCommenceTimeFrom
            | Self::InvalidCommenceTimeTo
            | Self::DateOutOfRange
            | Self::InvalidDaysFrom => "The requested date range is not valid.",
            Self::InvalidOddsFormat => "The requested odds format is not supported.",
            Self::HistoricalNotEntitled | Self::PlanRestriction => {
                "Historical odds are not included in the current plan."
            }
            Self::InternalError | Self::ServiceUnavailable => {
                "The odds service is temporarily unavailable. Please try again shortly."
            }
            Self::UnknownError => "Something went wrong fetching odds. Please try again.",
        }
    }

    /// Developer-facing remediation hint, independent of the user message
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::MissingKey => "No apiKey query parameter was sent. Check client construction.",
            Self::InvalidKey => "The API key was rejected. Verify ODDSLINE_API_KEY.",
            Self::DisabledKey => "The API key is disabled. Re-enable it in the provider dashboard.",
            Self::ExpiredKey => "The API key has expired. Rotate the key.",
            Self::OutOfUsageCredits => {
                "Monthly quota exhausted. Raise cache TTLs, trim regions/markets, or upgrade the plan."
            }
            Self::ExceededFreqLimit => {
                "Requests are arriving faster than the provider allows. The client backs off automatically; if this persists, lower rate_limit_per_sec."
            }
            Self::UnknownSport => "Sport key is not recognized. List sports via the /sports endpoint.",
            Self::InactiveSport => "Sport is out of season. Filter on the active flag from /sports.",
            Self::UnknownRegion => "Region key is not recognized. See data/regions.csv.",
            Self::InvalidRegion => "Region parameter is malformed. Pass comma-joined region keys.",
            Self::UnknownMarket => "Market key is not recognized. Run it through migration::migrate_market_key.",
            Self::InvalidMarket => "Market parameter is malformed. Pass comma-joined market keys.",
            Self::MarketNotSupported => {
                "Market is not offered for this sport. Check catalog::markets_by_sport_group."
            }
            Self::UnknownBookmaker => {
                "Bookmaker key is not recognized. Run it through migration::migrate_bookmaker_key."
            }
            Self::InvalidBookmaker => "Bookmaker parameter is malformed. Pass comma-joined keys.",
            Self::InvalidEventId => "Event id is malformed. Use ids from the events listing.",
            Self::EventNotFound => "Event id does not exist or has been removed.",
            Self::EventEnded => "Event has finished; odds are no longer published for it.",
            Self::InvalidDateFormat => "Dates must be ISO 8601 (e.g. 2026-01-15T00:00:00Z).",
            Self::InvalidCommenceTimeFrom => "commenceTimeFrom is malformed. Use ISO 8601.",
            Self::InvalidCommenceTimeTo => "commenceTimeTo is malformed. Use ISO 8601.",
            Self::DateOutOfRange => "Requested date is outside the provider's data window.",
            Self::InvalidOddsFormat => "oddsFormat must be american or decimal.",
            Self::InvalidDaysFrom => "daysFrom must be an integer between 1 and 3.",
            Self::HistoricalNotEntitled => "Historical endpoints need a paid plan.",
            Self::PlanRestriction => "Endpoint is not included in the current plan.",
            Self::TooManyEventIds => "Reduce the eventIds list; the provider caps it per call.",
            Self::MissingMarkets => "No markets parameter was sent where one is required.",
            Self::MissingRegions => "No regions parameter was sent where one is required.",
            Self::InternalError => "Provider-side failure. Safe to retry manually later.",
            Self::ServiceUnavailable => "Provider maintenance or outage. Check the status page.",
            Self::UnknownError => {
                "Unrecognized failure. Inspect the raw message and status code in logs."
            }
        }
    }

    /// Provider wire form of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingKey => "MISSING_KEY",
            Self::InvalidKey => "INVALID_KEY",
            Self::DisabledKey => "DISABLED_KEY",
            Self::ExpiredKey => "EXPIRED_KEY",
            Self::OutOfUsageCredits => "OUT_OF_USAGE_CREDITS",
            Self::ExceededFreqLimit => "EXCEEDED_FREQ_LIMIT",
            Self::UnknownSport => "UNKNOWN_SPORT",
            Self::InactiveSport => "INACTIVE_SPORT",
            Self::UnknownRegion => "UNKNOWN_REGION",
            Self::InvalidRegion => "INVALID_REGION",
            Self::UnknownMarket => "UNKNOWN_MARKET",
            Self::InvalidMarket => "INVALID_MARKET",
            Self::MarketNotSupported => "MARKET_NOT_SUPPORTED",
            Self::UnknownBookmaker => "UNKNOWN_BOOKMAKER",
            Self::InvalidBookmaker => "INVALID_BOOKMAKER",
            Self::InvalidEventId => "INVALID_EVENT_ID",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::EventEnded => "EVENT_ENDED",
            Self::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Self::InvalidCommenceTimeFrom => "INVALID_COMMENCE_TIME_FROM",
            Self::InvalidCommenceTimeTo => "INVALID_COMMENCE_TIME_TO",
            Self::DateOutOfRange => "DATE_OUT_OF_RANGE",
            Self::InvalidOddsFormat => "INVALID_ODDS_FORMAT",
            Self::InvalidDaysFrom => "INVALID_DAYS_FROM",
            Self::HistoricalNotEntitled => "HISTORICAL_NOT_ENTITLED",
            Self::PlanRestriction => "PLAN_RESTRICTION",
            Self::TooManyEventIds => "TOO_MANY_EVENT_IDS",
            Self::MissingMarkets => "MISSING_MARKETS",
            Self::MissingRegions => "MISSING_REGIONS",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// A classified provider failure
#[derive(Error, Debug, Clone)]
#[error("odds API error {} (HTTP {}): {}", .code.as_str(), .status, .message)]
pub struct OddsApiError {
    pub code: ApiErrorCode,
    /// Raw provider message, for logs only
    pub message: String,
    /// HTTP status of the failed call (0 for non-HTTP failures)
    pub status: u16,
    pub retryable: bool,
    /// The only error text intended for display
    pub user_message: String,
}

impl OddsApiError {
    fn with_code(code: ApiErrorCode, message: String, status: u16) -> Self {
        Self {
            code,
            message,
            status,
            retryable: code.is_retryable(),
            user_message: code.user_message().to_string(),
        }
    }

    /// Build from a provider error body. Non-JSON bodies and bodies without a
    /// recognizable code degrade to UnknownError rather than failing.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProviderErrorBody>(body) {
            Ok(parsed) => {
                let code = ApiErrorCode::parse(&parsed.code);
                let message = if parsed.message.is_empty() {
                    body.to_string()
                } else {
                    parsed.message
                };
                Self::with_code(code, message, status)
            }
            Err(_) => Self::with_code(ApiErrorCode::UnknownError, body.to_string(), status),
        }
    }

    /// Wrap a non-provider failure (network, JSON decode) as UnknownError
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::with_code(ApiErrorCode::UnknownError, message.into(), 0)
    }

    /// Narrowing check usable on any caught crate error
    pub fn is_retryable(err: &OddsLineError) -> bool {
        matches!(err, OddsLineError::Api(api_err) if api_err.retryable)
    }
}
