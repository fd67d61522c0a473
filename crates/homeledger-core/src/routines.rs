//! Recurring-payment templates and the materializer
//!
//! A routine never books anything by itself. The materializer turns due
//! templates into PENDING transactions, which stay invisible to balances
//! until a user confirms them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Frequency, OwnerFilter, Routine, RoutineStatus, Transaction, TxnKind, TxnStatus,
};
use crate::reports::{money, MaterializeReport, RoutineView};
use crate::store::{Collection, Store};

/// Prefix on descriptions of generated entries
const ROUTINE_PREFIX: &str = "[routine] ";

/// All routines, shaped for display
pub fn routine_list(store: &Store) -> Vec<RoutineView> {
    store
        .routines
        .iter()
        .map(|r| RoutineView {
            id: r.id.to_string(),
            name: r.name.clone(),
            amount: money(r.amount),
            kind: r.kind.to_string(),
            wallet_name: store
                .wallet(r.wallet_id)
                .map(|w| w.name.clone())
                .unwrap_or_default(),
            frequency: r.frequency.to_string(),
            next_run: r.next_run.to_string(),
            last_run: r.last_run.map(|d| d.to_string()),
            status: r.status.to_string(),
            owner: r.owner.clone(),
        })
        .collect()
}

/// Materialize every due routine in scope: each active template with
/// `next_run <= today` gets one pending transaction dated `next_run`, then
/// its schedule advances by one period. An existing pending entry for the
/// same routine and date suppresses the duplicate but the schedule still
/// advances. All changes land in a single commit.
pub fn materialize_due(
    store: &mut Store,
    owner: &OwnerFilter,
    today: NaiveDate,
) -> CoreResult<MaterializeReport> {
    let mut generated: Vec<Transaction> = Vec::new();
    let mut generated_ids: Vec<String> = Vec::new();
    let mut advanced = 0usize;

    for routine in &mut store.routines {
        if routine.status != RoutineStatus::Active || routine.next_run > today {
            continue;
        }
        if let OwnerFilter::Member(id) = owner {
            if &routine.owner != id {
                continue;
            }
        }
        let due_date = routine.next_run;
        let already_pending = store.transactions.iter().any(|t| {
            !t.deleted
                && t.status == TxnStatus::Pending
                && t.routine_id == Some(routine.id)
                && t.date == due_date
        });
        if !already_pending {
            let txn = Transaction {
                id: Uuid::new_v4(),
                amount: routine.amount,
                kind: routine.kind,
                wallet_id: routine.wallet_id,
                target_wallet_id: None,
                category_id: routine.category_id,
                date: due_date,
                description: format!("{}{}", ROUTINE_PREFIX, routine.name),
                created_by: routine.owner.clone(),
                status: TxnStatus::Pending,
                deleted: false,
                goal_item_id: None,
                routine_id: Some(routine.id),
                related_txn_id: None,
            };
            generated_ids.push(txn.id.to_string());
            generated.push(txn);
        }
        routine.next_run = routine.frequency.advance(due_date);
        routine.last_run = Some(today);
        advanced += 1;
    }

    if advanced == 0 {
        return Ok(MaterializeReport {
            generated_txn_ids: Vec::new(),
            advanced_routines: 0,
        });
    }

    if !generated.is_empty() {
        log::info!("materialized {} routine transaction(s)", generated.len());
    }
    store.transactions.extend(generated);
    store.persist(&[Collection::Transactions, Collection::Routines])?;

    Ok(MaterializeReport {
        generated_txn_ids: generated_ids,
        advanced_routines: advanced,
    })
}

/// Input for creating a routine
#[derive(Debug, Clone)]
pub struct NewRoutine {
    pub name: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub wallet_id: Uuid,
    pub category_id: Option<Uuid>,
    pub frequency: Frequency,
    pub next_run: NaiveDate,
    pub owner: String,
}

/// Create a routine template
pub fn create_routine(store: &mut Store, input: NewRoutine) -> CoreResult<Uuid> {
    if input.name.trim().is_empty() {
        return Err(CoreError::validation("Routine name must not be empty"));
    }
    if input.amount <= Decimal::ZERO {
        return Err(CoreError::validation("Amount must be positive"));
    }
    if input.kind == TxnKind::Transfer {
        return Err(CoreError::validation(
            "Routines generate income or expense entries only",
        ));
    }
    store.require_wallet(input.wallet_id)?;
    store.require_member(&input.owner)?;
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

    let routine = Routine {
        id: Uuid::new_v4(),
        name: input.name,
        amount: input.amount,
        kind: input.kind,
        wallet_id: input.wallet_id,
        category_id: input.category_id,
        frequency: input.frequency,
        next_run: input.next_run,
        last_run: None,
        status: RoutineStatus::Active,
        owner: input.owner,
    };
    let id = routine.id;
    store.routines.push(routine);
    store.persist(&[Collection::Routines])?;
    Ok(id)
}

fn set_status(store: &mut Store, id: Uuid, status: RoutineStatus) -> CoreResult<()> {
    let routine = store.require_routine_mut(id)?;
    routine.status = status;
    store.persist(&[Collection::Routines])?;
    Ok(())
}

/// Pause a routine; the materializer skips it until resumed
pub fn pause_routine(store: &mut Store, id: Uuid) -> CoreResult<()> {
    set_status(store, id, RoutineStatus::Paused)
}

/// Resume a paused routine
pub fn resume_routine(store: &mut Store, id: Uuid) -> CoreResult<()> {
    set_status(store, id, RoutineStatus::Active)
}

/// Delete a routine template. Entries it already generated stay in the
/// ledger untouched.
pub fn delete_routine(store: &mut Store, id: Uuid) -> CoreResult<()> {
    if store.routine(id).is_none() {
        return Err(CoreError::RoutineNotFound { id: id.to_string() });
    }
    store.routines.retain(|r| r.id != id);
    store.persist(&[Collection::Routines])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{confirm_transaction, create_wallet, wallet_balance, NewWallet};
    use crate::models::{Member, Owner, WalletKind};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn members() -> Vec<Member> {
        vec![Member {
            id: "m1".to_string(),
            name: "Member One".to_string(),
        }]
    }

    fn setup() -> (Store, Uuid) {
        let mut store = Store::in_memory(&members());
        let wallet_id = create_wallet(
            &mut store,
            NewWallet {
                name: "Checking".to_string(),
                kind: WalletKind::Bank,
                owner: Owner::Member("m1".to_string()),
                initial_balance: dec!(1000),
                bank_name: None,
            },
        )
        .unwrap();
        (store, wallet_id)
    }

    fn rent_routine(store: &mut Store, wallet_id: Uuid, next_run: NaiveDate) -> Uuid {
        create_routine(
            store,
            NewRoutine {
                name: "Rent".to_string(),
                amount: dec!(500),
                kind: TxnKind::Expense,
                wallet_id,
                category_id: None,
                frequency: Frequency::Monthly,
                next_run,
                owner: "m1".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn due_routine_generates_one_pending_entry_and_advances() {
        let (mut store, wallet_id) = setup();
        let routine_id = rent_routine(&mut store, wallet_id, d(2024, 1, 1));

        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 15)).unwrap();
        assert_eq!(report.generated_txn_ids.len(), 1);
        assert_eq!(report.advanced_routines, 1);

        let txn = store
            .transactions
            .iter()
            .find(|t| t.routine_id == Some(routine_id))
            .unwrap();
        assert_eq!(txn.status, TxnStatus::Pending);
        assert_eq!(txn.date, d(2024, 1, 1));
        assert_eq!(txn.description, "[routine] Rent");

        let routine = store.routine(routine_id).unwrap();
        assert_eq!(routine.next_run, d(2024, 2, 1));
        assert_eq!(routine.last_run, Some(d(2024, 1, 15)));

        // pending output never moves the balance until confirmed
        let balance = wallet_balance(&store, store.require_wallet(wallet_id).unwrap());
        assert_eq!(balance, dec!(1000));

        let txn_id: Uuid = report.generated_txn_ids[0].parse().unwrap();
        confirm_transaction(&mut store, txn_id).unwrap();
        let balance = wallet_balance(&store, store.require_wallet(wallet_id).unwrap());
        assert_eq!(balance, dec!(500));
    }

    #[test]
    fn future_routine_does_not_materialize() {
        let (mut store, wallet_id) = setup();
        rent_routine(&mut store, wallet_id, d(2024, 2, 1));

        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 15)).unwrap();
        assert!(report.generated_txn_ids.is_empty());
        assert_eq!(report.advanced_routines, 0);
    }

    #[test]
    fn paused_routine_is_skipped() {
        let (mut store, wallet_id) = setup();
        let routine_id = rent_routine(&mut store, wallet_id, d(2024, 1, 1));
        pause_routine(&mut store, routine_id).unwrap();

        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 15)).unwrap();
        assert!(report.generated_txn_ids.is_empty());
        assert_eq!(store.routine(routine_id).unwrap().next_run, d(2024, 1, 1));

        resume_routine(&mut store, routine_id).unwrap();
        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 15)).unwrap();
        assert_eq!(report.generated_txn_ids.len(), 1);
    }

    #[test]
    fn existing_pending_entry_suppresses_the_duplicate() {
        let (mut store, wallet_id) = setup();
        let routine_id = rent_routine(&mut store, wallet_id, d(2024, 1, 1));
        materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 15)).unwrap();

        // rewind the schedule as if a crashed pass left it behind
        store.require_routine_mut(routine_id).unwrap().next_run = d(2024, 1, 1);
        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 16)).unwrap();
        assert!(report.generated_txn_ids.is_empty());
        assert_eq!(report.advanced_routines, 1);
        assert_eq!(store.routine(routine_id).unwrap().next_run, d(2024, 2, 1));

        let pending_count = store
            .transactions
            .iter()
            .filter(|t| t.routine_id == Some(routine_id) && t.status == TxnStatus::Pending)
            .count();
        assert_eq!(pending_count, 1);
    }

    #[test]
    fn one_entry_per_pass_even_when_far_behind() {
        let (mut store, wallet_id) = setup();
        let routine_id = rent_routine(&mut store, wallet_id, d(2024, 1, 1));

        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 4, 10)).unwrap();
        assert_eq!(report.generated_txn_ids.len(), 1);
        assert_eq!(store.routine(routine_id).unwrap().next_run, d(2024, 2, 1));

        // the next pass picks up the following period
        let report = materialize_due(&mut store, &OwnerFilter::All, d(2024, 4, 10)).unwrap();
        assert_eq!(report.generated_txn_ids.len(), 1);
        assert_eq!(store.routine(routine_id).unwrap().next_run, d(2024, 3, 1));
    }

    #[test]
    fn owner_scope_limits_which_routines_run() {
        let mut store = Store::in_memory(&[
            Member {
                id: "m1".to_string(),
                name: "Member One".to_string(),
            },
            Member {
                id: "m2".to_string(),
                name: "Member Two".to_string(),
            },
        ]);
        let wallet_id = create_wallet(
            &mut store,
            NewWallet {
                name: "Joint".to_string(),
                kind: WalletKind::Bank,
                owner: Owner::Joint,
                initial_balance: dec!(0),
                bank_name: None,
            },
        )
        .unwrap();
        rent_routine(&mut store, wallet_id, d(2024, 1, 1));
        create_routine(
            &mut store,
            NewRoutine {
                name: "Gym".to_string(),
                amount: dec!(30),
                kind: TxnKind::Expense,
                wallet_id,
                category_id: None,
                frequency: Frequency::Monthly,
                next_run: d(2024, 1, 1),
                owner: "m2".to_string(),
            },
        )
        .unwrap();

        let scope = OwnerFilter::Member("m2".to_string());
        let report = materialize_due(&mut store, &scope, d(2024, 1, 15)).unwrap();
        assert_eq!(report.generated_txn_ids.len(), 1);
        assert_eq!(store.transactions[0].description, "[routine] Gym");
    }

    #[test]
    fn deleted_routine_keeps_its_generated_entries() {
        let (mut store, wallet_id) = setup();
        let routine_id = rent_routine(&mut store, wallet_id, d(2024, 1, 1));
        materialize_due(&mut store, &OwnerFilter::All, d(2024, 1, 15)).unwrap();

        delete_routine(&mut store, routine_id).unwrap();
        assert!(store.routine(routine_id).is_none());
        assert_eq!(store.transactions.len(), 1);
    }
}
