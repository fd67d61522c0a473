//! Ledger aggregation and transaction mutations
//!
//! Balances, summaries, breakdowns, and trends are pure read-time reductions
//! over the transaction collection; no running total is ever stored. Only
//! non-deleted COMPLETED transactions count — a PENDING entry contributes to
//! nothing until the user confirms it.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    month_end, Category, Flexibility, Owner, OwnerFilter, Transaction, TxnKind, TxnStatus, Wallet,
    WalletKind,
};
use crate::reports::{
    money, CategoryEntry, CategoryReport, NetWorthPoint, NetWorthReport, PeriodSummary,
    SummaryBucket, TransactionView, TransactionsPage, TrendPoint, TrendReport, WalletDetail,
    WalletView,
};
use crate::store::{Collection, Store};
use crate::time::{LedgerFilter, Period};

const UNCATEGORIZED: &str = "Uncategorized";

// ==================== Read side ====================

/// Derived balance of a wallet: opening balance plus the signed sum of its
/// non-deleted, completed transactions.
pub fn wallet_balance(store: &Store, wallet: &Wallet) -> Decimal {
    let mut balance = wallet.initial_balance;
    for txn in &store.transactions {
        if txn.wallet_id == wallet.id && txn.is_counted() {
            balance += txn.signed_amount();
        }
    }
    balance
}

/// Balance as of the end of a given day
fn wallet_balance_as_of(store: &Store, wallet: &Wallet, as_of: NaiveDate) -> Decimal {
    let mut balance = wallet.initial_balance;
    for txn in &store.transactions {
        if txn.wallet_id == wallet.id && txn.is_counted() && txn.date <= as_of {
            balance += txn.signed_amount();
        }
    }
    balance
}

/// Resolve a filter into the set of wallet ids it covers.
/// A wallet filter narrows to that single wallet; an owner filter covers the
/// member's own wallets plus joint ones; `All` spans the household.
fn scoped_wallet_ids(store: &Store, filter: &LedgerFilter) -> CoreResult<HashSet<Uuid>> {
    if let Some(wallet_id) = filter.wallet_id {
        let wallet = store.require_wallet(wallet_id)?;
        return Ok(HashSet::from([wallet.id]));
    }
    if let OwnerFilter::Member(id) = &filter.owner {
        store.require_member(id)?;
    }
    Ok(store
        .wallets
        .iter()
        .filter(|w| !w.deleted && w.in_scope(&filter.owner))
        .map(|w| w.id)
        .collect())
}

fn category_name(store: &Store, txn: &Transaction) -> String {
    txn.category_id
        .and_then(|id| store.category(id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Shape a transaction for display, resolving wallet and category names
pub fn transaction_view(store: &Store, txn: &Transaction) -> TransactionView {
    let wallet_name = store
        .wallet(txn.wallet_id)
        .map(|w| w.name.clone())
        .unwrap_or_default();
    let target_wallet_name = txn
        .target_wallet_id
        .and_then(|id| store.wallet(id))
        .map(|w| w.name.clone());
    let resolved_category = txn
        .category_id
        .and_then(|id| store.category(id))
        .map(|c| c.name.clone());

    TransactionView {
        id: txn.id.to_string(),
        amount: money(txn.amount),
        kind: txn.kind.to_string(),
        status: txn.status.to_string(),
        date: txn.date.to_string(),
        description: txn.description.clone(),
        wallet_id: txn.wallet_id.to_string(),
        wallet_name,
        category_name: resolved_category,
        target_wallet_name,
        related_txn_id: txn.related_txn_id.map(|id| id.to_string()),
        created_by: txn.created_by.clone(),
    }
}

/// Income, expense, and net over a period, with per-day buckets for windows
/// up to 31 days and per-month buckets otherwise. Transfer legs net to zero
/// for the household and are excluded.
pub fn period_summary(
    store: &Store,
    filter: &LedgerFilter,
    today: NaiveDate,
) -> CoreResult<PeriodSummary> {
    let wallet_ids = scoped_wallet_ids(store, filter)?;
    let daily = matches!(filter.period.span_days(today), Some(days) if days <= 31);

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut count = 0usize;
    let mut buckets: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();

    for txn in &store.transactions {
        if !txn.is_counted()
            || txn.is_transfer_leg()
            || !wallet_ids.contains(&txn.wallet_id)
            || !filter.period.contains(txn.date, today)
        {
            continue;
        }
        count += 1;
        let label = if daily {
            txn.date.to_string()
        } else {
            txn.date.format("%Y-%m").to_string()
        };
        let bucket = buckets.entry(label).or_insert((Decimal::ZERO, Decimal::ZERO));
        match txn.kind {
            TxnKind::Income => {
                total_income += txn.amount;
                bucket.0 += txn.amount;
            }
            TxnKind::Expense => {
                total_expense += txn.amount;
                bucket.1 += txn.amount;
            }
            TxnKind::Transfer => {}
        }
    }

    Ok(PeriodSummary {
        start_date: filter.period.start_date(today).map(|d| d.to_string()),
        end_date: filter.period.end_date(today).map(|d| d.to_string()),
        total_income: money(total_income),
        total_expense: money(total_expense),
        net: money(total_income - total_expense),
        transaction_count: count,
        buckets: buckets
            .into_iter()
            .map(|(label, (income, expense))| SummaryBucket {
                label,
                income: money(income),
                expense: money(expense),
            })
            .collect(),
    })
}

/// Group completed, non-transfer transactions of one kind by category,
/// sorted descending by value. Missing categories bucket as "Uncategorized";
/// shares of a zero total come back as 0.
pub fn category_breakdown(
    store: &Store,
    filter: &LedgerFilter,
    today: NaiveDate,
    kind: TxnKind,
) -> CoreResult<CategoryReport> {
    if kind == TxnKind::Transfer {
        return Err(CoreError::validation(
            "Category breakdown applies to income or expense only",
        ));
    }
    let wallet_ids = scoped_wallet_ids(store, filter)?;

    let mut groups: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    for txn in &store.transactions {
        if !txn.is_counted()
            || txn.is_transfer_leg()
            || txn.kind != kind
            || !wallet_ids.contains(&txn.wallet_id)
            || !filter.period.contains(txn.date, today)
        {
            continue;
        }
        let entry = groups
            .entry(category_name(store, txn))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let total: Decimal = groups.values().map(|(amount, _)| *amount).sum();
    let mut entries: Vec<CategoryEntry> = groups
        .into_iter()
        .map(|(category, (amount, count))| CategoryEntry {
            category,
            amount: money(amount),
            percentage: if total.is_zero() {
                0.0
            } else {
                money(amount * Decimal::from(100) / total)
            },
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));

    Ok(CategoryReport {
        kind: kind.to_string(),
        entries,
        total: money(total),
    })
}

/// Per-day series for the current month and per-month series for the
/// trailing six months, for charting.
pub fn trend(store: &Store, filter: &LedgerFilter, today: NaiveDate) -> CoreResult<TrendReport> {
    let wallet_ids = scoped_wallet_ids(store, filter)?;

    let month_start = today.with_day(1).unwrap_or(today);
    let mut daily: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    let mut day = month_start;
    while day <= today {
        daily.insert(day, (Decimal::ZERO, Decimal::ZERO));
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let six_months_ago = month_start
        .checked_sub_months(Months::new(5))
        .unwrap_or(month_start);
    let mut monthly: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for offset in 0u32..6 {
        let anchor = month_start
            .checked_sub_months(Months::new(offset))
            .unwrap_or(month_start);
        monthly.insert(
            anchor.format("%Y-%m").to_string(),
            (Decimal::ZERO, Decimal::ZERO),
        );
    }

    for txn in &store.transactions {
        if !txn.is_counted() || txn.is_transfer_leg() || !wallet_ids.contains(&txn.wallet_id) {
            continue;
        }
        if let Some(bucket) = daily.get_mut(&txn.date) {
            match txn.kind {
                TxnKind::Income => bucket.0 += txn.amount,
                TxnKind::Expense => bucket.1 += txn.amount,
                TxnKind::Transfer => {}
            }
        }
        if txn.date >= six_months_ago {
            if let Some(bucket) = monthly.get_mut(&txn.date.format("%Y-%m").to_string()) {
                match txn.kind {
                    TxnKind::Income => bucket.0 += txn.amount,
                    TxnKind::Expense => bucket.1 += txn.amount,
                    TxnKind::Transfer => {}
                }
            }
        }
    }

    Ok(TrendReport {
        daily: daily
            .into_iter()
            .map(|(date, (income, expense))| TrendPoint {
                label: date.to_string(),
                income: money(income),
                expense: money(expense),
            })
            .collect(),
        monthly: monthly
            .into_iter()
            .map(|(label, (income, expense))| TrendPoint {
                label,
                income: money(income),
                expense: money(expense),
            })
            .collect(),
    })
}

/// Household net worth as of each of the last `months` month ends.
/// Liability wallets count as amounts owed and reduce net worth.
pub fn net_worth_series(store: &Store, months: u32, today: NaiveDate) -> NetWorthReport {
    let months = months.clamp(1, 60);
    let mut points = Vec::with_capacity(months as usize);

    for offset in (0..months).rev() {
        let month_anchor = today
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(offset)))
            .unwrap_or(today);
        let as_of = month_end(month_anchor);

        let mut assets = Decimal::ZERO;
        let mut owed = Decimal::ZERO;
        for wallet in store.wallets.iter().filter(|w| !w.deleted) {
            let balance = wallet_balance_as_of(store, wallet, as_of);
            if wallet.kind == WalletKind::Liability {
                owed += -balance;
            } else {
                assets += balance;
            }
        }

        points.push(NetWorthPoint {
            month: month_anchor.format("%Y-%m").to_string(),
            assets: money(assets),
            liabilities: money(owed),
            net_worth: money(assets - owed),
        });
    }

    NetWorthReport { points }
}

/// Shape a wallet with its derived balance
pub fn wallet_view(store: &Store, wallet: &Wallet) -> WalletView {
    WalletView {
        id: wallet.id.to_string(),
        name: wallet.name.clone(),
        kind: wallet.kind.to_string(),
        owner: wallet.owner.to_string(),
        initial_balance: money(wallet.initial_balance),
        current_balance: money(wallet_balance(store, wallet)),
        bank_name: wallet.bank_name.clone(),
    }
}

/// Non-deleted wallets in scope, with derived balances
pub fn wallet_views(store: &Store, owner: &OwnerFilter) -> CoreResult<Vec<WalletView>> {
    if let OwnerFilter::Member(id) = owner {
        store.require_member(id)?;
    }
    Ok(store
        .wallets
        .iter()
        .filter(|w| !w.deleted && w.in_scope(owner))
        .map(|w| wallet_view(store, w))
        .collect())
}

/// Wallet detail: balance plus paginated history, newest first.
/// Transfer legs do appear in a wallet's own list.
pub fn wallet_detail(
    store: &Store,
    wallet_id: Uuid,
    page: usize,
    per_page: usize,
) -> CoreResult<WalletDetail> {
    let wallet = store.require_wallet(wallet_id)?;

    let mut txns: Vec<&Transaction> = store
        .transactions
        .iter()
        .filter(|t| !t.deleted && t.wallet_id == wallet_id)
        .collect();
    txns.sort_by(|a, b| b.date.cmp(&a.date));

    let total_count = txns.len();
    let per_page = per_page.max(1);
    let page = page.max(1);
    let views = txns
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(|t| transaction_view(store, t))
        .collect();

    Ok(WalletDetail {
        wallet: wallet_view(store, wallet),
        transactions: TransactionsPage {
            transactions: views,
            total_count,
            page,
            per_page,
        },
    })
}

/// Paginated transaction list across a filter scope, newest first.
/// Pending entries are listed (they are visible, just never counted).
pub fn list_transactions(
    store: &Store,
    filter: &LedgerFilter,
    today: NaiveDate,
    page: usize,
    per_page: usize,
) -> CoreResult<TransactionsPage> {
    let wallet_ids = scoped_wallet_ids(store, filter)?;

    let mut txns: Vec<&Transaction> = store
        .transactions
        .iter()
        .filter(|t| {
            !t.deleted
                && wallet_ids.contains(&t.wallet_id)
                && filter.period.contains(t.date, today)
        })
        .collect();
    txns.sort_by(|a, b| b.date.cmp(&a.date));

    let total_count = txns.len();
    let per_page = per_page.max(1);
    let page = page.max(1);
    let views = txns
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(|t| transaction_view(store, t))
        .collect();

    Ok(TransactionsPage {
        transactions: views,
        total_count,
        page,
        per_page,
    })
}

// ==================== Mutations ====================

/// Input for creating a wallet
#[derive(Debug, Clone)]
pub struct NewWallet {
    pub name: String,
    pub kind: WalletKind,
    pub owner: Owner,
    pub initial_balance: Decimal,
    pub bank_name: Option<String>,
}

/// Create a wallet and persist the collection
pub fn create_wallet(store: &mut Store, input: NewWallet) -> CoreResult<Uuid> {
    if input.name.trim().is_empty() {
        return Err(CoreError::validation("Wallet name must not be empty"));
    }
    if let Owner::Member(id) = &input.owner {
        store.require_member(id)?;
    }
    let wallet = Wallet {
        id: Uuid::new_v4(),
        name: input.name,
        kind: input.kind,
        owner: input.owner,
        initial_balance: input.initial_balance,
        bank_name: input.bank_name,
        deleted: false,
    };
    let id = wallet.id;
    store.wallets.push(wallet);
    store.persist(&[Collection::Wallets])?;
    Ok(id)
}

/// Soft-delete a wallet; its transactions stay in the ledger
pub fn delete_wallet(store: &mut Store, id: Uuid) -> CoreResult<()> {
    let wallet = store
        .wallet_mut(id)
        .ok_or_else(|| CoreError::WalletNotFound { id: id.to_string() })?;
    wallet.deleted = true;
    store.persist(&[Collection::Wallets])?;
    Ok(())
}

/// Input for creating an income or expense transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub kind: TxnKind,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub date: NaiveDate,
    pub description: String,
    pub created_by: String,
    pub status: TxnStatus,
    pub goal_item_id: Option<Uuid>,
}

fn validate_amount(amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation("Amount must be positive"));
    }
    Ok(())
}

/// Create an income or expense entry. Transfers go through
/// [`create_transfer`] so the two legs always exist together.
pub fn create_transaction(store: &mut Store, input: NewTransaction) -> CoreResult<Uuid> {
    validate_amount(input.amount)?;
    if input.kind == TxnKind::Transfer {
        return Err(CoreError::validation(
            "Transfers must be created through the transfer operation",
        ));
    }
    store.require_wallet(input.wallet_id)?;
    store.require_member(&input.created_by)?;
    if let Some(category_id) = input.category_id {
        let category = store
            .category(category_id)
            .ok_or_else(|| CoreError::CategoryNotFound {
                id: category_id.to_string(),
            })?;
        if category.kind != input.kind {
            return Err(CoreError::validation(format!(
                "Category '{}' is a {} category",
                category.name, category.kind
            )));
        }
    }
    if let Some(item_id) = input.goal_item_id {
        if store.goal_item(item_id).is_none() {
            return Err(CoreError::GoalItemNotFound {
                id: item_id.to_string(),
            });
        }
        if input.kind != TxnKind::Expense {
            return Err(CoreError::validation(
                "Only expense transactions can fund a goal item",
            ));
        }
    }

    let txn = Transaction {
        id: Uuid::new_v4(),
        amount: input.amount,
        kind: input.kind,
        wallet_id: input.wallet_id,
        target_wallet_id: None,
        category_id: input.category_id,
        date: input.date,
        description: input.description,
        created_by: input.created_by,
        status: input.status,
        deleted: false,
        goal_item_id: input.goal_item_id,
        routine_id: None,
        related_txn_id: None,
    };
    let id = txn.id;
    store.transactions.push(txn);
    store.persist(&[Collection::Transactions])?;
    Ok(id)
}

/// Input for creating a transfer
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub created_by: String,
}

/// Create both legs of a transfer in one commit: an expense entry on the
/// source wallet and an income entry on the target, linked reciprocally.
pub fn create_transfer(store: &mut Store, input: NewTransfer) -> CoreResult<(Uuid, Uuid)> {
    validate_amount(input.amount)?;
    if input.from_wallet_id == input.to_wallet_id {
        return Err(CoreError::validation(
            "Transfer source and target must differ",
        ));
    }
    store.require_wallet(input.from_wallet_id)?;
    store.require_wallet(input.to_wallet_id)?;
    store.require_member(&input.created_by)?;

    let out_id = Uuid::new_v4();
    let in_id = Uuid::new_v4();

    let out_leg = Transaction {
        id: out_id,
        amount: input.amount,
        kind: TxnKind::Expense,
        wallet_id: input.from_wallet_id,
        target_wallet_id: Some(input.to_wallet_id),
        category_id: None,
        date: input.date,
        description: input.description.clone(),
        created_by: input.created_by.clone(),
        status: TxnStatus::Completed,
        deleted: false,
        goal_item_id: None,
        routine_id: None,
        related_txn_id: Some(in_id),
    };
    let in_leg = Transaction {
        id: in_id,
        amount: input.amount,
        kind: TxnKind::Income,
        wallet_id: input.to_wallet_id,
        target_wallet_id: Some(input.from_wallet_id),
        category_id: None,
        date: input.date,
        description: input.description,
        created_by: input.created_by,
        status: TxnStatus::Completed,
        deleted: false,
        goal_item_id: None,
        routine_id: None,
        related_txn_id: Some(out_id),
    };

    store.transactions.push(out_leg);
    store.transactions.push(in_leg);
    store.persist(&[Collection::Transactions])?;
    Ok((out_id, in_id))
}

/// Confirm a pending entry: PENDING -> COMPLETED, now counted everywhere
pub fn confirm_transaction(store: &mut Store, id: Uuid) -> CoreResult<()> {
    let txn = store
        .transactions
        .iter_mut()
        .find(|t| t.id == id && !t.deleted)
        .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })?;
    if txn.status != TxnStatus::Pending {
        return Err(CoreError::validation("Transaction is not pending"));
    }
    txn.status = TxnStatus::Completed;
    store.persist(&[Collection::Transactions])?;
    Ok(())
}

/// Soft-delete an entry. Deleting either transfer leg deletes both, in the
/// same commit, so the pairing invariant survives.
pub fn delete_transaction(store: &mut Store, id: Uuid) -> CoreResult<()> {
    let related = {
        let txn = store.require_transaction(id)?;
        txn.related_txn_id
    };
    if let Some(txn) = store.transactions.iter_mut().find(|t| t.id == id) {
        txn.deleted = true;
    }
    if let Some(related_id) = related {
        if let Some(leg) = store.transactions.iter_mut().find(|t| t.id == related_id) {
            leg.deleted = true;
        }
    }
    store.persist(&[Collection::Transactions])?;
    Ok(())
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub kind: TxnKind,
    pub flexibility: Flexibility,
    pub budget_group: Option<String>,
}

/// Create a category and persist the collection
pub fn create_category(store: &mut Store, input: NewCategory) -> CoreResult<Uuid> {
    if input.name.trim().is_empty() {
        return Err(CoreError::validation("Category name must not be empty"));
    }
    let category = Category {
        id: Uuid::new_v4(),
        name: input.name,
        kind: input.kind,
        flexibility: input.flexibility,
        budget_group: input.budget_group,
        deleted: false,
    };
    let id = category.id;
    store.categories.push(category);
    store.persist(&[Collection::Categories])?;
    Ok(id)
}

/// Soft-delete a category; transactions referencing it roll up as
/// "Uncategorized" from then on
pub fn delete_category(store: &mut Store, id: Uuid) -> CoreResult<()> {
    let category = store
        .categories
        .iter_mut()
        .find(|c| c.id == id && !c.deleted)
        .ok_or_else(|| CoreError::CategoryNotFound { id: id.to_string() })?;
    category.deleted = true;
    store.persist(&[Collection::Categories])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;
    use crate::time::Preset;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn members() -> Vec<Member> {
        vec![
            Member {
                id: "m1".to_string(),
                name: "Member One".to_string(),
            },
            Member {
                id: "m2".to_string(),
                name: "Member Two".to_string(),
            },
        ]
    }

    fn bank_wallet(store: &mut Store, owner: Owner, opening: Decimal) -> Uuid {
        create_wallet(
            store,
            NewWallet {
                name: "Checking".to_string(),
                kind: WalletKind::Bank,
                owner,
                initial_balance: opening,
                bank_name: None,
            },
        )
        .unwrap()
    }

    fn expense(
        store: &mut Store,
        wallet_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        category_id: Option<Uuid>,
        status: TxnStatus,
    ) -> Uuid {
        create_transaction(
            store,
            NewTransaction {
                amount,
                kind: TxnKind::Expense,
                wallet_id,
                category_id,
                date,
                description: "expense".to_string(),
                created_by: "m1".to_string(),
                status,
                goal_item_id: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn balance_is_opening_plus_completed_signed_sum() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Member("m1".to_string()), dec!(1000000));
        expense(
            &mut store,
            wallet_id,
            dec!(200000),
            d(2024, 1, 10),
            None,
            TxnStatus::Completed,
        );

        let wallet = store.require_wallet(wallet_id).unwrap();
        assert_eq!(wallet_balance(&store, wallet), dec!(800000));
    }

    #[test]
    fn pending_counts_only_after_confirmation() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Member("m1".to_string()), dec!(1000000));
        expense(
            &mut store,
            wallet_id,
            dec!(200000),
            d(2024, 1, 10),
            None,
            TxnStatus::Completed,
        );
        let pending_id = expense(
            &mut store,
            wallet_id,
            dec!(50000),
            d(2024, 1, 12),
            None,
            TxnStatus::Pending,
        );

        let balance = wallet_balance(&store, store.require_wallet(wallet_id).unwrap());
        assert_eq!(balance, dec!(800000));

        confirm_transaction(&mut store, pending_id).unwrap();
        let balance = wallet_balance(&store, store.require_wallet(wallet_id).unwrap());
        assert_eq!(balance, dec!(750000));

        // a confirmed entry cannot be confirmed again
        assert!(matches!(
            confirm_transaction(&mut store, pending_id),
            Err(CoreError::ValidationError { .. })
        ));
    }

    #[test]
    fn category_breakdown_shares_of_total() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(0));
        let cat_a = create_category(
            &mut store,
            NewCategory {
                name: "Groceries".to_string(),
                kind: TxnKind::Expense,
                flexibility: Flexibility::Variable,
                budget_group: None,
            },
        )
        .unwrap();
        let cat_b = create_category(
            &mut store,
            NewCategory {
                name: "Transport".to_string(),
                kind: TxnKind::Expense,
                flexibility: Flexibility::Variable,
                budget_group: None,
            },
        )
        .unwrap();
        expense(
            &mut store,
            wallet_id,
            dec!(400),
            d(2024, 3, 5),
            Some(cat_a),
            TxnStatus::Completed,
        );
        expense(
            &mut store,
            wallet_id,
            dec!(200),
            d(2024, 3, 6),
            Some(cat_b),
            TxnStatus::Completed,
        );

        let filter = LedgerFilter {
            period: Period::Preset(Preset::MonthToDate),
            ..LedgerFilter::default()
        };
        let report =
            category_breakdown(&store, &filter, d(2024, 3, 17), TxnKind::Expense).unwrap();
        assert_eq!(report.total, 600.0);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].category, "Groceries");
        assert!((report.entries[0].percentage - 66.7).abs() < 0.1);
        assert_eq!(report.entries[1].category, "Transport");
        assert!((report.entries[1].percentage - 33.3).abs() < 0.1);
    }

    #[test]
    fn uncategorized_entries_get_their_own_bucket() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(0));
        expense(
            &mut store,
            wallet_id,
            dec!(150),
            d(2024, 3, 5),
            None,
            TxnStatus::Completed,
        );

        let filter = LedgerFilter::default();
        let report =
            category_breakdown(&store, &filter, d(2024, 3, 17), TxnKind::Expense).unwrap();
        assert_eq!(report.entries[0].category, "Uncategorized");
        assert_eq!(report.entries[0].percentage, 100.0);
    }

    #[test]
    fn transfer_moves_balance_but_not_household_totals() {
        let mut store = Store::in_memory(&members());
        let from = bank_wallet(&mut store, Owner::Member("m1".to_string()), dec!(1000));
        let to = bank_wallet(&mut store, Owner::Member("m2".to_string()), dec!(0));

        create_transfer(
            &mut store,
            NewTransfer {
                from_wallet_id: from,
                to_wallet_id: to,
                amount: dec!(300),
                date: d(2024, 3, 5),
                description: "top up".to_string(),
                created_by: "m1".to_string(),
            },
        )
        .unwrap();

        let from_balance = wallet_balance(&store, store.require_wallet(from).unwrap());
        let to_balance = wallet_balance(&store, store.require_wallet(to).unwrap());
        assert_eq!(from_balance, dec!(700));
        assert_eq!(to_balance, dec!(300));

        let summary = period_summary(&store, &LedgerFilter::default(), d(2024, 3, 17)).unwrap();
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.transaction_count, 0);
    }

    #[test]
    fn deleting_one_transfer_leg_deletes_both() {
        let mut store = Store::in_memory(&members());
        let from = bank_wallet(&mut store, Owner::Joint, dec!(1000));
        let to = bank_wallet(&mut store, Owner::Joint, dec!(0));
        let (out_id, in_id) = create_transfer(
            &mut store,
            NewTransfer {
                from_wallet_id: from,
                to_wallet_id: to,
                amount: dec!(300),
                date: d(2024, 3, 5),
                description: "top up".to_string(),
                created_by: "m1".to_string(),
            },
        )
        .unwrap();

        delete_transaction(&mut store, out_id).unwrap();
        assert!(store.transaction(out_id).is_none());
        assert!(store.transaction(in_id).is_none());
        let from_balance = wallet_balance(&store, store.require_wallet(from).unwrap());
        assert_eq!(from_balance, dec!(1000));
    }

    #[test]
    fn transfer_to_same_wallet_is_rejected() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(1000));
        let result = create_transfer(
            &mut store,
            NewTransfer {
                from_wallet_id: wallet_id,
                to_wallet_id: wallet_id,
                amount: dec!(100),
                date: d(2024, 3, 5),
                description: "loop".to_string(),
                created_by: "m1".to_string(),
            },
        );
        assert!(matches!(result, Err(CoreError::ValidationError { .. })));
    }

    #[test]
    fn nonpositive_amounts_are_rejected() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(0));
        let result = create_transaction(
            &mut store,
            NewTransaction {
                amount: dec!(0),
                kind: TxnKind::Expense,
                wallet_id,
                category_id: None,
                date: d(2024, 3, 5),
                description: "nothing".to_string(),
                created_by: "m1".to_string(),
                status: TxnStatus::Completed,
                goal_item_id: None,
            },
        );
        assert!(matches!(result, Err(CoreError::ValidationError { .. })));
    }

    #[test]
    fn owner_filter_includes_joint_wallets() {
        let mut store = Store::in_memory(&members());
        let own = bank_wallet(&mut store, Owner::Member("m1".to_string()), dec!(0));
        let joint = bank_wallet(&mut store, Owner::Joint, dec!(0));
        let other = bank_wallet(&mut store, Owner::Member("m2".to_string()), dec!(0));
        for wallet_id in [own, joint, other] {
            expense(
                &mut store,
                wallet_id,
                dec!(10),
                d(2024, 3, 5),
                None,
                TxnStatus::Completed,
            );
        }

        let filter = LedgerFilter {
            owner: OwnerFilter::Member("m1".to_string()),
            ..LedgerFilter::default()
        };
        let summary = period_summary(&store, &filter, d(2024, 3, 17)).unwrap();
        assert_eq!(summary.total_expense, 20.0);
    }

    #[test]
    fn summary_buckets_daily_for_short_windows_monthly_for_long() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(0));
        expense(
            &mut store,
            wallet_id,
            dec!(10),
            d(2024, 3, 5),
            None,
            TxnStatus::Completed,
        );
        expense(
            &mut store,
            wallet_id,
            dec!(20),
            d(2024, 2, 5),
            None,
            TxnStatus::Completed,
        );

        let today = d(2024, 3, 17);
        let short = LedgerFilter {
            period: Period::Preset(Preset::MonthToDate),
            ..LedgerFilter::default()
        };
        let summary = period_summary(&store, &short, today).unwrap();
        assert_eq!(summary.buckets.len(), 1);
        assert_eq!(summary.buckets[0].label, "2024-03-05");

        let long = LedgerFilter {
            period: Period::Preset(Preset::Last3Months),
            ..LedgerFilter::default()
        };
        let summary = period_summary(&store, &long, today).unwrap();
        let labels: Vec<&str> = summary.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-02", "2024-03"]);
    }

    #[test]
    fn net_worth_subtracts_liabilities() {
        let mut store = Store::in_memory(&members());
        bank_wallet(&mut store, Owner::Joint, dec!(5000));
        create_wallet(
            &mut store,
            NewWallet {
                name: "Credit card".to_string(),
                kind: WalletKind::Liability,
                owner: Owner::Joint,
                initial_balance: dec!(-500),
                bank_name: Some("First Bank".to_string()),
            },
        )
        .unwrap();

        let report = net_worth_series(&store, 1, d(2024, 3, 17));
        assert_eq!(report.points.len(), 1);
        assert_eq!(report.points[0].month, "2024-03");
        assert_eq!(report.points[0].assets, 5000.0);
        assert_eq!(report.points[0].liabilities, 500.0);
        assert_eq!(report.points[0].net_worth, 4500.0);
    }

    #[test]
    fn wallet_detail_paginates_newest_first() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(0));
        for day in 1..=5 {
            expense(
                &mut store,
                wallet_id,
                dec!(10),
                d(2024, 3, day),
                None,
                TxnStatus::Completed,
            );
        }

        let detail = wallet_detail(&store, wallet_id, 1, 2).unwrap();
        assert_eq!(detail.transactions.total_count, 5);
        assert_eq!(detail.transactions.transactions.len(), 2);
        assert_eq!(detail.transactions.transactions[0].date, "2024-03-05");

        let last_page = wallet_detail(&store, wallet_id, 3, 2).unwrap();
        assert_eq!(last_page.transactions.transactions.len(), 1);
    }

    #[test]
    fn deleted_wallet_is_gone_but_history_remains() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(100));
        let txn_id = expense(
            &mut store,
            wallet_id,
            dec!(10),
            d(2024, 3, 5),
            None,
            TxnStatus::Completed,
        );

        delete_wallet(&mut store, wallet_id).unwrap();
        assert!(store.wallet(wallet_id).is_none());
        assert!(store.transaction(txn_id).is_some());
    }

    #[test]
    fn trend_covers_current_month_and_six_months() {
        let mut store = Store::in_memory(&members());
        let wallet_id = bank_wallet(&mut store, Owner::Joint, dec!(0));
        expense(
            &mut store,
            wallet_id,
            dec!(10),
            d(2024, 3, 5),
            None,
            TxnStatus::Completed,
        );
        expense(
            &mut store,
            wallet_id,
            dec!(40),
            d(2023, 12, 20),
            None,
            TxnStatus::Completed,
        );

        let report = trend(&store, &LedgerFilter::default(), d(2024, 3, 17)).unwrap();
        assert_eq!(report.daily.len(), 17);
        assert_eq!(report.monthly.len(), 6);
        assert_eq!(report.monthly[0].label, "2023-10");
        let december = report
            .monthly
            .iter()
            .find(|p| p.label == "2023-12")
            .unwrap();
        assert_eq!(december.expense, 40.0);
        let day_five = report.daily.iter().find(|p| p.label == "2024-03-05").unwrap();
        assert_eq!(day_five.expense, 10.0);
    }
}
