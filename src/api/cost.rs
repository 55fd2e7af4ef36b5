//! Quota cost estimation.
//!
//! The provider charges quota credits per call depending on the endpoint and
//! the number of markets and regions requested. The estimate is logged for
//! observability only; the provider remains the quota authority and the
//! client never blocks a call locally on its own estimate.

/// Estimate the quota cost of a call before issuing it.
///
/// Rule table, most specific first. Market/region counts default to 1 when
/// the parameter is absent or empty.
pub fn estimate_cost(path: &str, markets: Option<usize>, regions: Option<usize>) -> u64 {
    let m = markets.filter(|n| *n > 0).unwrap_or(1) as u64;
    let r = regions.filter(|n| *n > 0).unwrap_or(1) as u64;

    if path.contains("/scores") || path.contains("/markets") {
        1
    } else if path.contains("/historical") {
        // Historical snapshots bill at 10x whatever the live shape would
        10 * m * r
    } else if is_event_odds(path) {
        10 * m * r
    } else if path.contains("/odds") {
        m * r
    } else if path.contains("/participants") {
        1
    } else if path.contains("/sports") {
        // Sport and event listings are free
        0
    } else {
        1
    }
}

fn is_event_odds(path: &str) -> bool {
    path.contains("/events/") && path.ends_with("/odds")
}
