//! Wallet and category endpoints
//!
//! Endpoints:
//! - api_wallets / api_wallet_create / api_wallet_detail / api_wallet_delete
//! - api_categories / api_category_create / api_category_delete
//! - page_wallets: Wallet overview page

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use homeledger_core::ledger;
use homeledger_core::models::{Owner, OwnerFilter};
use homeledger_core::reports::{WalletDetail, WalletView};

use super::{parse_filter, parse_pagination, parse_uuid};
use crate::error::ApiError;
use crate::{page_shell, AppState};

// ==================== JSON API ====================

/// List non-deleted wallets in scope, with derived balances
pub async fn api_wallets(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<WalletView>>, ApiError> {
    let filter = parse_filter(&params)?;
    let store = state.store.read().await;
    Ok(Json(ledger::wallet_views(&store, &filter.owner)?))
}

#[derive(Debug, Deserialize)]
pub struct WalletPayload {
    pub name: String,
    pub kind: String,
    /// Member id or `joint`
    pub owner: String,
    #[serde(default)]
    pub initial_balance: Decimal,
    #[serde(default)]
    pub bank_name: Option<String>,
}

fn parse_owner(raw: &str) -> Owner {
    if raw.eq_ignore_ascii_case("joint") {
        Owner::Joint
    } else {
        Owner::Member(raw.to_string())
    }
}

/// Create a wallet
pub async fn api_wallet_create(
    State(state): State<AppState>,
    Json(payload): Json<WalletPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = payload
        .kind
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let mut store = state.store.write().await;
    let id = ledger::create_wallet(
        &mut store,
        ledger::NewWallet {
            name: payload.name,
            kind,
            owner: parse_owner(&payload.owner),
            initial_balance: payload.initial_balance,
            bank_name: payload.bank_name,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// Wallet detail with paginated history
pub async fn api_wallet_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<WalletDetail>, ApiError> {
    let id = parse_uuid(&id, "wallet")?;
    let (page, per_page) = parse_pagination(&params, state.config.pagination.records_per_page);
    let store = state.store.read().await;
    Ok(Json(ledger::wallet_detail(&store, id, page, per_page)?))
}

/// Soft-delete a wallet
pub async fn api_wallet_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "wallet")?;
    let mut store = state.store.write().await;
    ledger::delete_wallet(&mut store, id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// List non-deleted categories
pub async fn api_categories(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.read().await;
    let categories: Vec<serde_json::Value> = store
        .categories
        .iter()
        .filter(|c| !c.deleted)
        .map(|c| {
            serde_json::json!({
                "id": c.id.to_string(),
                "name": c.name,
                "kind": c.kind.to_string(),
                "flexibility": c.flexibility.to_string(),
                "budget_group": c.budget_group,
            })
        })
        .collect();
    Ok(Json(serde_json::json!({ "categories": categories })))
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub kind: String,
    pub flexibility: String,
    #[serde(default)]
    pub budget_group: Option<String>,
}

/// Create a category
pub async fn api_category_create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = payload
        .kind
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let flexibility = payload
        .flexibility
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let mut store = state.store.write().await;
    let id = ledger::create_category(
        &mut store,
        ledger::NewCategory {
            name: payload.name,
            kind,
            flexibility,
            budget_group: payload.budget_group,
        },
    )?;
    Ok(Json(serde_json::json!({ "id": id.to_string() })))
}

/// Soft-delete a category
pub async fn api_category_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_uuid(&id, "category")?;
    let mut store = state.store.write().await;
    ledger::delete_category(&mut store, id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ==================== Pages ====================

/// Wallets page: balances grouped by kind
pub async fn page_wallets(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let owner: OwnerFilter = params
        .get("owner")
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| ApiError::bad_request(e))?
        .unwrap_or_default();

    let store = state.store.read().await;
    let wallets = ledger::wallet_views(&store, &owner)?;
    let total: f64 = wallets.iter().map(|w| w.current_balance).sum();

    let mut rows = String::new();
    for w in &wallets {
        rows.push_str(&format!(
            r#"<tr class='border-b hover:bg-gray-50'>
                <td class='px-4 py-3 font-medium'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-sm text-gray-500'>{}</td>
                <td class='px-4 py-3 text-right font-mono'>{:.2}</td>
            </tr>"#,
            w.name,
            w.kind,
            w.owner,
            w.current_balance
        ));
    }
    if wallets.is_empty() {
        rows.push_str("<tr><td colspan='4' class='px-4 py-6 text-center text-gray-400'>No wallets yet</td></tr>");
    }

    let content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Wallets</h2>
            <p class='text-lg'>Total: <span class='font-mono font-bold'>{:.2}</span></p>
        </div>
        <div class='bg-white rounded-xl shadow-sm overflow-hidden'>
            <table class='w-full text-left'>
                <thead class='bg-gray-50 text-xs uppercase text-gray-500'>
                    <tr><th class='px-4 py-3'>Name</th><th class='px-4 py-3'>Kind</th><th class='px-4 py-3'>Owner</th><th class='px-4 py-3 text-right'>Balance</th></tr>
                </thead>
                <tbody>{}</tbody>
            </table>
        </div>"#,
        total, rows
    );

    Ok(Html(page_shell("Wallets", "/wallets", &content)))
}
