//! Route modules for the API server
//!
//! Each module carries its JSON endpoints and, where the module has a page,
//! the server-rendered HTMX page alongside them:
//! - dashboard: Overview page, runs the routine materializer on load
//! - wallets: Wallets and categories
//! - transactions: Ledger entries and transfers
//! - reports: Aggregation endpoints
//! - goals: Savings goals
//! - routines: Recurring templates
//! - debts: Informal debts
//! - budgets: Monthly budgets

pub mod budgets;
pub mod dashboard;
pub mod debts;
pub mod goals;
pub mod reports;
pub mod routines;
pub mod transactions;
pub mod wallets;

use chrono::NaiveDate;
use homeledger_core::{LedgerFilter, Period};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;

/// Reference date for preset resolution
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {} id: {}", what, raw)))
}

fn parse_date(raw: &str, what: &str) -> Result<NaiveDate, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} (expected YYYY-MM-DD): {}", what, raw)))
}

/// Build a ledger filter from the common query params:
/// `owner`, `wallet`, and either `preset` or `start`+`end`
pub(crate) fn parse_filter(params: &HashMap<String, String>) -> Result<LedgerFilter, ApiError> {
    let mut filter = LedgerFilter::default();

    if let Some(owner) = params.get("owner") {
        filter.owner = owner
            .parse()
            .map_err(|e: String| ApiError::bad_request(e))?;
    }
    if let Some(wallet) = params.get("wallet") {
        filter.wallet_id = Some(parse_uuid(wallet, "wallet")?);
    }

    match (params.get("start"), params.get("end")) {
        (Some(start), Some(end)) => {
            let start = parse_date(start, "start date")?;
            let end = parse_date(end, "end date")?;
            filter.period =
                Period::range(start, end).map_err(|e: String| ApiError::bad_request(e))?;
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ApiError::bad_request(
                "Explicit ranges need both start and end",
            ));
        }
        (None, None) => {
            if let Some(preset) = params.get("preset") {
                filter.period = Period::Preset(
                    preset.parse().map_err(|e: String| ApiError::bad_request(e))?,
                );
            }
        }
    }

    Ok(filter)
}

/// Pagination params: 1-based `page`, `per_page` capped at 200
pub(crate) fn parse_pagination(
    params: &HashMap<String, String>,
    default_per_page: usize,
) -> (usize, usize) {
    let page = params
        .get("page")
        .and_then(|s| s.parse().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1);
    let per_page = params
        .get("per_page")
        .and_then(|s| s.parse().ok())
        .filter(|&p| p >= 1 && p <= 200)
        .unwrap_or(default_per_page);
    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeledger_core::models::OwnerFilter;
    use homeledger_core::Preset;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_filter_is_household_month_to_date() {
        let filter = parse_filter(&params(&[])).unwrap();
        assert_eq!(filter.owner, OwnerFilter::All);
        assert_eq!(filter.period, Period::Preset(Preset::MonthToDate));
        assert!(filter.wallet_id.is_none());
    }

    #[test]
    fn explicit_range_beats_preset() {
        let filter = parse_filter(&params(&[
            ("start", "2024-01-01"),
            ("end", "2024-01-31"),
            ("preset", "ytd"),
        ]))
        .unwrap();
        assert!(matches!(filter.period, Period::Range { .. }));
    }

    #[test]
    fn half_open_range_is_rejected() {
        assert!(parse_filter(&params(&[("start", "2024-01-01")])).is_err());
    }

    #[test]
    fn bad_preset_and_bad_wallet_are_rejected() {
        assert!(parse_filter(&params(&[("preset", "fortnight")])).is_err());
        assert!(parse_filter(&params(&[("wallet", "not-a-uuid")])).is_err());
    }

    #[test]
    fn pagination_clamps_to_sane_values() {
        assert_eq!(parse_pagination(&params(&[]), 50), (1, 50));
        assert_eq!(
            parse_pagination(&params(&[("page", "0"), ("per_page", "9999")]), 50),
            (1, 50)
        );
        assert_eq!(
            parse_pagination(&params(&[("page", "3"), ("per_page", "25")]), 50),
            (3, 25)
        );
    }
}
