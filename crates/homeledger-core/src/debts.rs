//! Informal debts: money lent out or borrowed outside the wallet system
//!
//! A debt is standalone until settlement, which books exactly one ledger
//! entry and flips the record to PAID in the same commit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{Debt, DebtKind, DebtStatus, Transaction, TxnKind, TxnStatus};
use crate::reports::{money, DebtView};
use crate::store::{Collection, Store};

/// All debts, active first, newest first within a status
pub fn debt_list(store: &Store) -> Vec<DebtView> {
    let mut debts: Vec<&Debt> = store.debts.iter().collect();
    debts.sort_by(|a, b| {
        (a.status == DebtStatus::Paid)
            .cmp(&(b.status == DebtStatus::Paid))
            .then(b.date.cmp(&a.date))
    });
    debts
        .into_iter()
        .map(|d| DebtView {
            id: d.id.to_string(),
            kind: d.kind.to_string(),
            counterparty: d.counterparty.clone(),
            amount: money(d.amount),
            date: d.date.to_string(),
            due_date: d.due_date.map(|d| d.to_string()),
            status: d.status.to_string(),
            owner: d.owner.clone(),
            settled_txn_id: d.settled_txn_id.map(|id| id.to_string()),
        })
        .collect()
}

/// Input for recording a debt
#[derive(Debug, Clone)]
pub struct NewDebt {
    pub kind: DebtKind,
    pub counterparty: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub owner: String,
}

/// Record a debt. No ledger entry is booked until settlement.
pub fn create_debt(store: &mut Store, input: NewDebt) -> CoreResult<Uuid> {
    if input.counterparty.trim().is_empty() {
        return Err(CoreError::validation("Counterparty must not be empty"));
    }
    if input.amount <= Decimal::ZERO {
        return Err(CoreError::validation("Amount must be positive"));
    }
    if let Some(due) = input.due_date {
        if due < input.date {
            return Err(CoreError::validation("Due date precedes the debt date"));
        }
    }
    store.require_member(&input.owner)?;

    let debt = Debt {
        id: Uuid::new_v4(),
        kind: input.kind,
        counterparty: input.counterparty,
        amount: input.amount,
        date: input.date,
        due_date: input.due_date,
        status: DebtStatus::Active,
        owner: input.owner,
        settled_txn_id: None,
    };
    let id = debt.id;
    store.debts.push(debt);
    store.persist(&[Collection::Debts])?;
    Ok(id)
}

/// Settle a debt against a wallet: money lent comes back as income, money
/// borrowed leaves as an expense. The entry and the PAID flip land in one
/// commit, and a debt settles at most once.
pub fn settle_debt(
    store: &mut Store,
    debt_id: Uuid,
    wallet_id: Uuid,
    date: NaiveDate,
) -> CoreResult<Uuid> {
    store.require_wallet(wallet_id)?;
    let debt = store
        .debt(debt_id)
        .ok_or_else(|| CoreError::DebtNotFound {
            id: debt_id.to_string(),
        })?;
    if debt.status == DebtStatus::Paid {
        return Err(CoreError::validation("Debt is already settled"));
    }

    let kind = match debt.kind {
        DebtKind::Lent => TxnKind::Income,
        DebtKind::Borrowed => TxnKind::Expense,
    };
    let txn = Transaction {
        id: Uuid::new_v4(),
        amount: debt.amount,
        kind,
        wallet_id,
        target_wallet_id: None,
        category_id: None,
        date,
        description: format!("Debt settlement: {}", debt.counterparty),
        created_by: debt.owner.clone(),
        status: TxnStatus::Completed,
        deleted: false,
        goal_item_id: None,
        routine_id: None,
        related_txn_id: None,
    };
    let txn_id = txn.id;
    store.transactions.push(txn);

    if let Some(debt) = store.debts.iter_mut().find(|d| d.id == debt_id) {
        debt.status = DebtStatus::Paid;
        debt.settled_txn_id = Some(txn_id);
    }

    store.persist(&[Collection::Transactions, Collection::Debts])?;
    Ok(txn_id)
}
