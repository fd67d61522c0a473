//! Debt endpoints
//!
//! Endpoints:
//! - api_debts / api_debt_create
//! - api_debt_settle: Books the settlement entry and flips the debt to PAID
//! - page_debts: Debt overview page

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use homeledger_core::debts;
use homeledger_core::models::DebtKind;
use homeledger_core::reports::DebtView;

use super::{parse_uuid, today};
use crate::error::ApiError;
use crate::{page_shell, AppState};

// ==================== JSON API ====================

/// List debts, active first
pub async fn api_debts(State(state): State<AppState>) -> Result<Json<Vec<DebtView>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(debts::debt_list(&store)))
}

#[derive(Debug, Deserialize)]
pub struct DebtPayload {
    /// `lent` or `borrowed`
    pub kind: String,
    pub counterparty: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub owner: String,
}

/// Record a debt
pub async fn api_debt_create(
    State(state): State<AppState>,
    Json(payload): Json<DebtPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind: DebtKind = payload
        .kind
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let mut store = state.store.write().await;
    let id = debts::create_debt(
        &mut store,
        debts::NewDebt {
            kind,
            counterparty: payload.counterparty,
            amount: payload.amount,
            date: payload.date,
            due_date: payload.due_date,
            owner: payload.owner,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

#[derive(Debug, Deserialize)]
pub struct SettlePayload {
    pub wallet_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Settle a debt against a wallet
pub async fn api_debt_settle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SettlePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let debt_id = parse_uuid(&id, "debt")?;
    let wallet_id = parse_uuid(&payload.wallet_id, "wallet")?;
    let date = payload.date.unwrap_or_else(today);
    let mut store = state.store.write().await;
    let txn_id = debts::settle_debt(&mut store, debt_id, wallet_id, date)?;
    Ok(Json(serde_json::json!({ "settled_txn_id": txn_id.to_string() })))
}

// ==================== Pages ====================

/// Debts page
pub async fn page_debts(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let store = state.store.read().await;
    let list = debts::debt_list(&store);

    let mut rows = String::new();
    for d in &list {
        let direction = if d.kind == "lent" { "owed to us" } else { "we owe" };
        let status_class = if d.status == "ACTIVE" {
            "bg-amber-100 text-amber-700"
        } else {
            "bg-green-100 text-green-700"
        };
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='px-4 py-3 font-medium'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3'><span class='px-2 py-0.5 text-xs rounded-full {}'>{}</span></td>
                <td class='px-4 py-3 text-right font-mono'>{:.2}</td>
            </tr>"#,
            d.counterparty,
            direction,
            d.date,
            d.due_date.as_deref().unwrap_or("-"),
            status_class,
            d.status,
            d.amount
        ));
    }
    if list.is_empty() {
        rows.push_str(
            "<tr><td colspan='6' class='px-4 py-6 text-center text-gray-400'>No debts recorded</td></tr>",
        );
    }

    let content = format!(
        r#"<h2 class='text-2xl font-bold mb-4'>Debts</h2>
        <div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-xs uppercase text-gray-500'>
                    <tr><th class='px-4 py-3'>Counterparty</th><th class='px-4 py-3'>Direction</th><th class='px-4 py-3'>Date</th><th class='px-4 py-3'>Due</th><th class='px-4 py-3'>Status</th><th class='px-4 py-3 text-right'>Amount</th></tr>
                </thead>
                <tbody>{}</tbody>
            </table>
        </div>"#,
        rows
    );
    Ok(Html(page_shell("Debts", "/debts", &content)))
}
