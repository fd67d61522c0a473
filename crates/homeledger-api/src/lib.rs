//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: Overview page; materializes due routines on load
//! - routes::wallets: Wallet list, detail, create, delete
//! - routes::transactions: Transaction list, create, transfer, confirm
//! - routes::reports: Summary, category breakdown, trend, net worth
//! - routes::goals: Goal rollups and items
//! - routes::routines: Recurring templates and the materializer
//! - routes::debts: Debt tracking and settlement
//! - routes::budgets: Monthly budgets

pub mod error;
pub mod routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use homeledger_config::Config;
use homeledger_core::Store;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::budgets::{api_budget_get, api_budget_put, api_budget_summary, page_budgets};
    use routes::dashboard::page_dashboard;
    use routes::debts::{api_debt_create, api_debt_settle, api_debts, page_debts};
    use routes::goals::{
        api_goal_create, api_goal_delete, api_goal_detail, api_goal_item_create, api_goals,
        page_goals,
    };
    use routes::reports::{api_category_report, api_net_worth, api_summary, api_trend};
    use routes::routines::{
        api_routine_create, api_routine_delete, api_routine_pause, api_routine_resume,
        api_routines, api_routines_run, page_routines,
    };
    use routes::transactions::{
        api_transaction_confirm, api_transaction_create, api_transaction_delete,
        api_transactions, api_transfer_create, page_transactions,
    };
    use routes::wallets::{
        api_categories, api_category_create, api_category_delete, api_wallet_create,
        api_wallet_delete, api_wallet_detail, api_wallets, page_wallets,
    };

    Router::new()
        // JSON API
        .route("/api/health", get(health_check))
        .route("/api/summary", get(api_summary))
        .route("/api/reports/categories", get(api_category_report))
        .route("/api/reports/trend", get(api_trend))
        .route("/api/reports/net-worth", get(api_net_worth))
        .route("/api/wallets", get(api_wallets).post(api_wallet_create))
        .route("/api/wallets/:id", get(api_wallet_detail).delete(api_wallet_delete))
        .route("/api/categories", get(api_categories).post(api_category_create))
        .route("/api/categories/:id", delete(api_category_delete))
        .route(
            "/api/transactions",
            get(api_transactions).post(api_transaction_create),
        )
        .route("/api/transactions/:id", delete(api_transaction_delete))
        .route("/api/transactions/:id/confirm", post(api_transaction_confirm))
        .route("/api/transfers", post(api_transfer_create))
        .route("/api/goals", get(api_goals).post(api_goal_create))
        .route("/api/goals/:id", get(api_goal_detail).delete(api_goal_delete))
        .route("/api/goals/:id/items", post(api_goal_item_create))
        .route("/api/routines", get(api_routines).post(api_routine_create))
        .route("/api/routines/run", post(api_routines_run))
        .route("/api/routines/:id", delete(api_routine_delete))
        .route("/api/routines/:id/pause", post(api_routine_pause))
        .route("/api/routines/:id/resume", post(api_routine_resume))
        .route("/api/debts", get(api_debts).post(api_debt_create))
        .route("/api/debts/:id/settle", post(api_debt_settle))
        .route("/api/budgets/:member/:period", get(api_budget_get))
        .route("/api/budgets/:member/:period", put(api_budget_put))
        .route("/api/budgets/:member/:period/summary", get(api_budget_summary))
        // Pages
        .route("/", get(page_dashboard))
        .route("/wallets", get(page_wallets))
        .route("/transactions", get(page_transactions))
        .route("/goals", get(page_goals))
        .route("/routines", get(page_routines))
        .route("/debts", get(page_debts))
        .route("/budgets", get(page_budgets))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Bind and serve until the process is stopped
pub async fn start_server(config: Config, store: Store) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        store: Arc::new(RwLock::new(store)),
        config,
    };
    let router = create_router(state);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Homeledger</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard"),
        ("/wallets", "Wallets"),
        ("/transactions", "Transactions"),
        ("/goals", "Goals"),
        ("/routines", "Routines"),
        ("/debts", "Debts"),
        ("/budgets", "Budgets"),
    ];

    let mut nav = String::from(
        "<div class='bg-white border-r h-screen flex flex-col w-56 flex-shrink-0'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Homeledger</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>",
    );
    for (path, label) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Standard two-column page shell: sidebar plus content
pub fn page_shell(title: &str, current_path: &str, content: &str) -> String {
    base_html(
        title,
        &format!(
            "<div class='flex'>{}<main class='flex-1 p-6 overflow-y-auto h-screen'>{}</main></div>",
            nav_sidebar(current_path),
            content
        ),
    )
}
