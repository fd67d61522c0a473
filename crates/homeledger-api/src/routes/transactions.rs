//! Transaction endpoints
//!
//! Endpoints:
//! - api_transactions: Paginated list with owner/wallet/period filters
//! - api_transaction_create: Income or expense entry
//! - api_transfer_create: Both legs of a wallet-to-wallet transfer
//! - api_transaction_confirm: PENDING -> COMPLETED
//! - api_transaction_delete: Soft delete (both transfer legs)
//! - page_transactions: Transaction list page

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use homeledger_core::ledger;
use homeledger_core::models::{TxnKind, TxnStatus};
use homeledger_core::reports::TransactionsPage;

use super::{parse_filter, parse_pagination, parse_uuid, today};
use crate::error::ApiError;
use crate::{page_shell, AppState};

// ==================== JSON API ====================

/// Paginated transaction list, newest first
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TransactionsPage>, ApiError> {
    let filter = parse_filter(&params)?;
    let (page, per_page) = parse_pagination(&params, state.config.pagination.records_per_page);
    let store = state.store.read().await;
    Ok(Json(ledger::list_transactions(
        &store, &filter, today(), page, per_page,
    )?))
}

#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub amount: Decimal,
    /// `income` or `expense`
    pub kind: String,
    pub wallet_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub created_by: String,
    /// `PENDING` or `COMPLETED`; defaults to completed
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub goal_item_id: Option<String>,
}

/// Create an income or expense entry
pub async fn api_transaction_create(
    State(state): State<AppState>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind: TxnKind = payload
        .kind
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let wallet_id = parse_uuid(&payload.wallet_id, "wallet")?;
    let category_id = payload
        .category_id
        .as_deref()
        .map(|s| parse_uuid(s, "category"))
        .transpose()?;
    let goal_item_id = payload
        .goal_item_id
        .as_deref()
        .map(|s| parse_uuid(s, "goal item"))
        .transpose()?;

    let mut store = state.store.write().await;
    let id = ledger::create_transaction(
        &mut store,
        ledger::NewTransaction {
            amount: payload.amount,
            kind,
            wallet_id,
            category_id,
            date: payload.date,
            description: payload.description,
            created_by: payload.created_by,
            status: if payload.pending {
                TxnStatus::Pending
            } else {
                TxnStatus::Completed
            },
            goal_item_id,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

#[derive(Debug, Deserialize)]
pub struct TransferPayload {
    pub from_wallet_id: String,
    pub to_wallet_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub created_by: String,
}

/// Create both legs of a transfer in one commit
pub async fn api_transfer_create(
    State(state): State<AppState>,
    Json(payload): Json<TransferPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let from = parse_uuid(&payload.from_wallet_id, "wallet")?;
    let to = parse_uuid(&payload.to_wallet_id, "wallet")?;
    let mut store = state.store.write().await;
    let (out_id, in_id) = ledger::create_transfer(
        &mut store,
        ledger::NewTransfer {
            from_wallet_id: from,
            to_wallet_id: to,
            amount: payload.amount,
            date: payload.date,
            description: payload.description,
            created_by: payload.created_by,
        },
    )?;
    Ok(Json(serde_json::json!({
        "out_txn_id": out_id.to_string(),
        "in_txn_id": in_id.to_string(),
    })))
}

/// Confirm a pending entry
pub async fn api_transaction_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "transaction")?;
    let mut store = state.store.write().await;
    ledger::confirm_transaction(&mut store, id)?;
    Ok(Json(serde_json::json!({ "confirmed": true })))
}

/// Soft-delete an entry (and its paired transfer leg)
pub async fn api_transaction_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "transaction")?;
    let mut store = state.store.write().await;
    ledger::delete_transaction(&mut store, id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ==================== Pages ====================

/// Transactions page
pub async fn page_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let filter = parse_filter(&params)?;
    let (page, per_page) = parse_pagination(&params, state.config.pagination.records_per_page);
    let store = state.store.read().await;
    let listing = ledger::list_transactions(&store, &filter, today(), page, per_page)?;

    let mut rows = String::new();
    for t in &listing.transactions {
        let amount_class = match t.kind.as_str() {
            "income" => "text-green-600",
            _ => "text-red-600",
        };
        let status_badge = if t.status == "PENDING" {
            "<span class='px-2 py-0.5 text-xs rounded-full bg-amber-100 text-amber-700'>PENDING</span>"
        } else {
            ""
        };
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3'>{} {}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-right font-mono {}'>{:.2}</td>
            </tr>"#,
            t.date,
            t.description,
            status_badge,
            t.wallet_name,
            t.category_name.as_deref().unwrap_or("-"),
            amount_class,
            t.amount
        ));
    }
    if listing.transactions.is_empty() {
        rows.push_str("<tr><td colspan='5' class='px-4 py-6 text-center text-gray-400'>No transactions in this period</td></tr>");
    }

    let total_pages = listing.total_count.div_ceil(listing.per_page).max(1);
    let content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            <p class='text-sm text-gray-500'>{} records, page {} of {}</p>
        </div>
        <div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-xs uppercase text-gray-500'>
                    <tr><th class='px-4 py-3'>Date</th><th class='px-4 py-3'>Description</th><th class='px-4 py-3'>Wallet</th><th class='px-4 py-3'>Category</th><th class='px-4 py-3 text-right'>Amount</th></tr>
                </thead>
                <tbody>{}</tbody>
            </table>
        </div>"#,
        listing.total_count, listing.page, total_pages, rows
    );

    Ok(Html(page_shell("Transactions", "/transactions", &content)))
}
