//! Core data models for the household ledger

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A household member mirrored from configuration into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable identifier used in owner fields and filters
    pub id: String,
    /// Display name
    pub name: String,
}

/// Who owns a wallet or goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Owner {
    /// Owned by a single household member
    Member(String),
    /// Shared by the whole household
    Joint,
}

impl Owner {
    /// Check whether the owner matches a member filter.
    /// Joint documents belong to every member.
    pub fn matches_member(&self, member_id: &str) -> bool {
        match self {
            Owner::Member(id) => id == member_id,
            Owner::Joint => true,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Member(id) => write!(f, "{}", id),
            Owner::Joint => write!(f, "joint"),
        }
    }
}

/// Owner scope for aggregation queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    /// Everything the household owns
    All,
    /// One member's wallets plus joint wallets
    Member(String),
}

impl Default for OwnerFilter {
    fn default() -> Self {
        OwnerFilter::All
    }
}

impl std::str::FromStr for OwnerFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(OwnerFilter::All),
            id => Ok(OwnerFilter::Member(id.to_string())),
        }
    }
}

impl std::fmt::Display for OwnerFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerFilter::All => write!(f, "all"),
            OwnerFilter::Member(id) => write!(f, "{}", id),
        }
    }
}

/// Wallet type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletKind {
    /// Bank account
    Bank,
    /// Electronic wallet
    EWallet,
    /// Physical cash
    Cash,
    /// Credit card, loan, or other owed balance
    Liability,
    /// Investment account
    Investment,
}

impl std::str::FromStr for WalletKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bank" => Ok(WalletKind::Bank),
            "e-wallet" | "ewallet" => Ok(WalletKind::EWallet),
            "cash" => Ok(WalletKind::Cash),
            "liability" => Ok(WalletKind::Liability),
            "investment" => Ok(WalletKind::Investment),
            _ => Err(format!("Invalid wallet kind: {}", s)),
        }
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletKind::Bank => write!(f, "bank"),
            WalletKind::EWallet => write!(f, "e-wallet"),
            WalletKind::Cash => write!(f, "cash"),
            WalletKind::Liability => write!(f, "liability"),
            WalletKind::Investment => write!(f, "investment"),
        }
    }
}

/// A named account holding a derived balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique wallet identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Wallet type
    pub kind: WalletKind,
    /// Owning member or joint
    pub owner: Owner,
    /// Opening balance; the current balance is always derived from this
    /// plus the signed sum of completed transactions
    pub initial_balance: Decimal,
    /// Issuing bank (bank and liability wallets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    /// Soft-delete flag
    #[serde(default)]
    pub deleted: bool,
}

impl Wallet {
    /// Check whether the wallet falls inside an owner filter scope
    pub fn in_scope(&self, filter: &OwnerFilter) -> bool {
        match filter {
            OwnerFilter::All => true,
            OwnerFilter::Member(id) => self.owner.matches_member(id),
        }
    }
}

/// Transaction type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
    Transfer,
}

impl std::str::FromStr for TxnKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TxnKind::Income),
            "expense" => Ok(TxnKind::Expense),
            "transfer" => Ok(TxnKind::Transfer),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TxnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnKind::Income => write!(f, "income"),
            TxnKind::Expense => write!(f, "expense"),
            TxnKind::Transfer => write!(f, "transfer"),
        }
    }
}

/// Transaction confirmation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxnStatus {
    /// Awaiting user confirmation; excluded from every balance and total
    Pending,
    /// Confirmed; counts toward balances and analytics
    Completed,
}

impl std::fmt::Display for TxnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnStatus::Pending => write!(f, "PENDING"),
            TxnStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// A single ledger entry
///
/// A transfer is always stored as two linked entries: an expense leg on the
/// source wallet and an income leg on the target wallet, each carrying the
/// other's id in `related_txn_id`. Both legs are created and soft-deleted
/// together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: Uuid,
    /// Positive amount; direction comes from `kind`
    pub amount: Decimal,
    /// Income, expense, or transfer leg direction
    pub kind: TxnKind,
    /// Primary wallet the entry is booked against
    pub wallet_id: Uuid,
    /// Opposite wallet of a transfer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_wallet_id: Option<Uuid>,
    /// Category reference; absent entries roll up as "Uncategorized"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// Booking date
    pub date: NaiveDate,
    /// Free-text description
    pub description: String,
    /// Member id of the creator
    pub created_by: String,
    /// Confirmation status
    pub status: TxnStatus,
    /// Soft-delete flag
    #[serde(default)]
    pub deleted: bool,
    /// Goal item funded by this entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_item_id: Option<Uuid>,
    /// Routine template that generated this entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<Uuid>,
    /// Paired transfer leg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_txn_id: Option<Uuid>,
}

impl Transaction {
    /// Check whether this entry is one leg of a transfer
    pub fn is_transfer_leg(&self) -> bool {
        self.related_txn_id.is_some() || self.kind == TxnKind::Transfer
    }

    /// Check whether the entry counts toward balances and totals
    pub fn is_counted(&self) -> bool {
        !self.deleted && self.status == TxnStatus::Completed
    }

    /// Signed contribution of this entry to its primary wallet
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TxnKind::Income => self.amount,
            TxnKind::Expense => -self.amount,
            // A transfer-typed leg without the income/expense split books
            // against its primary wallet as an outflow.
            TxnKind::Transfer => -self.amount,
        }
    }
}

/// Category flexibility classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flexibility {
    Fixed,
    Variable,
}

impl std::str::FromStr for Flexibility {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Flexibility::Fixed),
            "variable" => Ok(Flexibility::Variable),
            _ => Err(format!("Invalid flexibility: {}", s)),
        }
    }
}

impl std::fmt::Display for Flexibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flexibility::Fixed => write!(f, "fixed"),
            Flexibility::Variable => write!(f, "variable"),
        }
    }
}

/// Transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Which transaction kind the category applies to
    pub kind: TxnKind,
    pub flexibility: Flexibility,
    /// Budget bucket the category rolls up into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_group: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Goal visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Private,
    Shared,
}

impl std::str::FromStr for Visibility {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "shared" => Ok(Visibility::Shared),
            _ => Err(format!("Invalid visibility: {}", s)),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Private => write!(f, "PRIVATE"),
            Visibility::Shared => write!(f, "SHARED"),
        }
    }
}

/// A savings target with individually-priced sub-items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub owner: Owner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub visibility: Visibility,
    /// Display theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Named sub-groups items can be sorted into
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Goal {
    /// A goal is visible when shared, or when the requester owns it
    pub fn visible_to(&self, member_id: &str) -> bool {
        self.visibility == Visibility::Shared || self.owner.matches_member(member_id)
    }
}

/// An individually-priced item inside a goal.
/// Its actual amount is always derived from linked expense transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalItem {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub estimated_amount: Decimal,
}

/// Debt direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    /// The household lent money out
    Lent,
    /// The household borrowed money
    Borrowed,
}

impl std::str::FromStr for DebtKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lent" => Ok(DebtKind::Lent),
            "borrowed" => Ok(DebtKind::Borrowed),
            _ => Err(format!("Invalid debt kind: {}", s)),
        }
    }
}

impl std::fmt::Display for DebtKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebtKind::Lent => write!(f, "lent"),
            DebtKind::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// Debt settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    Active,
    Paid,
}

impl std::fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebtStatus::Active => write!(f, "ACTIVE"),
            DebtStatus::Paid => write!(f, "PAID"),
        }
    }
}

/// A tracked amount owed to or by the household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub kind: DebtKind,
    /// The other party
    pub counterparty: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: DebtStatus,
    /// Member id of the owner
    pub owner: String,
    /// Transaction produced by settlement; set exactly once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_txn_id: Option<Uuid>,
}

/// Recurrence frequency for routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Advance a date by exactly one period.
    /// Month-based periods clamp the day to the target month's length.
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Weekly => date + Duration::days(7),
            Frequency::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
            Frequency::Quarterly => date.checked_add_months(Months::new(3)).unwrap_or(date),
            Frequency::Yearly => date.checked_add_months(Months::new(12)).unwrap_or(date),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(format!("Invalid frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Quarterly => write!(f, "quarterly"),
            Frequency::Yearly => write!(f, "yearly"),
        }
    }
}

/// Routine activity status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutineStatus {
    Active,
    Paused,
}

impl std::fmt::Display for RoutineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutineStatus::Active => write!(f, "ACTIVE"),
            RoutineStatus::Paused => write!(f, "PAUSED"),
        }
    }
}

/// A recurring-payment template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    /// Income or expense; routines never generate transfers
    pub kind: TxnKind,
    pub wallet_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub frequency: Frequency,
    /// Next date a pending transaction is due to be generated for
    pub next_run: NaiveDate,
    /// Last time the materializer touched this template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<NaiveDate>,
    pub status: RoutineStatus,
    /// Member id of the owner
    pub owner: String,
}

/// Budget tracking cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCadence {
    Weekly,
    Monthly,
}

/// A named spending group inside a monthly budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetGroup {
    pub name: String,
    pub limit: Decimal,
    pub cadence: BudgetCadence,
    /// Categories whose expenses count against this group
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Per-member, per-period (`YYYY-MM`) set of spending groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub id: Uuid,
    /// Member id the budget belongs to
    pub member_id: String,
    /// Period in `YYYY-MM` form
    pub period: String,
    pub groups: Vec<BudgetGroup>,
}

/// Parse a `YYYY-MM` period string into its first and last day
pub fn parse_period_month(period: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let well_formed = period.len() == 7
        && period.as_bytes()[4] == b'-'
        && period
            .chars()
            .enumerate()
            .all(|(i, c)| i == 4 || c.is_ascii_digit());
    if !well_formed {
        return Err(format!("Invalid period (expected YYYY-MM): {}", period));
    }
    let start = NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d")
        .map_err(|_| format!("Invalid period (expected YYYY-MM): {}", period))?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| format!("Invalid period (expected YYYY-MM): {}", period))?;
    Ok((start, end))
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}
