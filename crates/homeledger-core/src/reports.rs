//! Report structures for API responses
//!
//! Plain serializable records: ids and dates as strings, amounts as numbers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Convert a stored decimal into the number form the API emits
pub fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Wallet list entry with its derived balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletView {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub owner: String,
    pub initial_balance: f64,
    pub current_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

/// Transaction list entry with names resolved for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: String,
    pub amount: f64,
    pub kind: String,
    pub status: String,
    pub date: String,
    pub description: String,
    pub wallet_id: String,
    pub wallet_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_wallet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_txn_id: Option<String>,
    pub created_by: String,
}

/// Paginated transaction list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsPage {
    pub transactions: Vec<TransactionView>,
    pub total_count: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Wallet detail: derived balance plus its transaction history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletDetail {
    pub wallet: WalletView,
    pub transactions: TransactionsPage,
}

/// One bucket of a period summary (a day or a month)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryBucket {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for monthly ones
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// Income/expense totals over a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub transaction_count: usize,
    pub buckets: Vec<SummaryBucket>,
}

/// Category breakdown entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub amount: f64,
    /// Share of the period total, 0 when the total is zero
    pub percentage: f64,
    pub count: usize,
}

/// Category report sorted descending by value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub kind: String,
    pub entries: Vec<CategoryEntry>,
    pub total: f64,
}

/// One point of a trend series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// Daily series for the current month plus a monthly series for the
/// trailing six months
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub daily: Vec<TrendPoint>,
    pub monthly: Vec<TrendPoint>,
}

/// Net worth as of one month end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthPoint {
    /// `YYYY-MM`
    pub month: String,
    pub assets: f64,
    /// Amount owed; subtracted from assets
    pub liabilities: f64,
    pub net_worth: f64,
}

/// Net worth history report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthReport {
    pub points: Vec<NetWorthPoint>,
}

/// Goal list entry with derived totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub visibility: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    pub total_estimated: f64,
    pub total_actual: f64,
    /// Percent of the estimated total already paid, 0 when nothing is estimated
    pub progress: f64,
    pub item_count: usize,
}

/// Goal item with its derived actual amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalItemView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub estimated_amount: f64,
    pub actual_amount: f64,
    pub progress: f64,
}

/// Goal detail: item rollup plus payment history, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDetail {
    pub goal: GoalSummary,
    pub items: Vec<GoalItemView>,
    pub payments: Vec<GoalPayment>,
}

/// One payment toward a goal item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPayment {
    pub txn_id: String,
    pub item_name: String,
    pub wallet_name: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

/// Routine list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineView {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub kind: String,
    pub wallet_name: String,
    pub frequency: String,
    pub next_run: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
    pub status: String,
    pub owner: String,
}

/// Outcome of one materializer pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeReport {
    /// Ids of the pending transactions inserted in this pass
    pub generated_txn_ids: Vec<String>,
    /// Routines whose schedule advanced in this pass
    pub advanced_routines: usize,
}

/// Debt list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtView {
    pub id: String,
    pub kind: String,
    pub counterparty: String,
    pub amount: f64,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_txn_id: Option<String>,
}

/// One spending group of a budget summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetGroupSummary {
    pub name: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Percent of the limit spent, 0 when the limit is zero
    pub used: f64,
}

/// Budget summary for one member and period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub member_id: String,
    pub period: String,
    pub groups: Vec<BudgetGroupSummary>,
    pub total_limit: f64,
    pub total_spent: f64,
}
