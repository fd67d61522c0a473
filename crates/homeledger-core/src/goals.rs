//! Savings goals and their item rollups
//!
//! A goal never stores progress. Each item's actual amount is derived from
//! the completed expense transactions linked to it, so deleting a payment
//! immediately rewinds the goal.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{Goal, GoalItem, Owner, Visibility};
use crate::reports::{money, GoalDetail, GoalItemView, GoalPayment, GoalSummary};
use crate::store::{Collection, Store};

fn item_actual(store: &Store, item_id: Uuid) -> Decimal {
    store
        .transactions
        .iter()
        .filter(|t| t.is_counted() && t.goal_item_id == Some(item_id))
        .map(|t| t.amount)
        .sum()
}

fn percent(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        money(part * Decimal::from(100) / whole)
    }
}

fn goal_summary(store: &Store, goal: &Goal) -> GoalSummary {
    let mut total_estimated = Decimal::ZERO;
    let mut total_actual = Decimal::ZERO;
    let mut item_count = 0usize;
    for item in store.goal_items.iter().filter(|i| i.goal_id == goal.id) {
        total_estimated += item.estimated_amount;
        total_actual += item_actual(store, item.id);
        item_count += 1;
    }

    GoalSummary {
        id: goal.id.to_string(),
        name: goal.name.clone(),
        owner: goal.owner.to_string(),
        visibility: goal.visibility.to_string(),
        target_date: goal.target_date.map(|d| d.to_string()),
        total_estimated: money(total_estimated),
        total_actual: money(total_actual),
        progress: percent(total_actual, total_estimated),
        item_count,
    }
}

/// Goals visible to the requesting member: shared goals plus their own
pub fn goal_list(store: &Store, requester: &str) -> CoreResult<Vec<GoalSummary>> {
    store.require_member(requester)?;
    Ok(store
        .goals
        .iter()
        .filter(|g| g.visible_to(requester))
        .map(|g| goal_summary(store, g))
        .collect())
}

/// Full rollup of one goal: items with derived actuals plus the payment
/// history, newest first. A private goal is invisible to non-owners.
pub fn goal_detail(store: &Store, goal_id: Uuid, requester: &str) -> CoreResult<GoalDetail> {
    store.require_member(requester)?;
    let goal = store.require_goal(goal_id)?;
    if !goal.visible_to(requester) {
        return Err(CoreError::Unauthorized);
    }

    let items: Vec<GoalItemView> = store
        .goal_items
        .iter()
        .filter(|i| i.goal_id == goal_id)
        .map(|item| {
            let actual = item_actual(store, item.id);
            GoalItemView {
                id: item.id.to_string(),
                name: item.name.clone(),
                group: item.group.clone(),
                estimated_amount: money(item.estimated_amount),
                actual_amount: money(actual),
                progress: percent(actual, item.estimated_amount),
            }
        })
        .collect();

    let mut payment_txns: Vec<_> = store
        .transactions
        .iter()
        .filter(|t| {
            t.is_counted()
                && t.goal_item_id
                    .and_then(|id| store.goal_item(id))
                    .map(|i| i.goal_id == goal_id)
                    .unwrap_or(false)
        })
        .collect();
    payment_txns.sort_by(|a, b| b.date.cmp(&a.date));

    let payments = payment_txns
        .into_iter()
        .map(|t| GoalPayment {
            txn_id: t.id.to_string(),
            item_name: t
                .goal_item_id
                .and_then(|id| store.goal_item(id))
                .map(|i| i.name.clone())
                .unwrap_or_default(),
            wallet_name: store
                .wallet(t.wallet_id)
                .map(|w| w.name.clone())
                .unwrap_or_default(),
            amount: money(t.amount),
            date: t.date.to_string(),
            description: t.description.clone(),
        })
        .collect();

    Ok(GoalDetail {
        goal: goal_summary(store, goal),
        items,
        payments,
    })
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub owner: Owner,
    pub target_date: Option<chrono::NaiveDate>,
    pub visibility: Visibility,
    pub theme: Option<String>,
    pub groups: Vec<String>,
}

/// Create a goal and persist the collection
pub fn create_goal(store: &mut Store, input: NewGoal) -> CoreResult<Uuid> {
    if input.name.trim().is_empty() {
        return Err(CoreError::validation("Goal name must not be empty"));
    }
    if let Owner::Member(id) = &input.owner {
        store.require_member(id)?;
    }
    let goal = Goal {
        id: Uuid::new_v4(),
        name: input.name,
        owner: input.owner,
        target_date: input.target_date,
        visibility: input.visibility,
        theme: input.theme,
        groups: input.groups,
    };
    let id = goal.id;
    store.goals.push(goal);
    store.persist(&[Collection::Goals])?;
    Ok(id)
}

/// Input for adding an item to a goal
#[derive(Debug, Clone)]
pub struct NewGoalItem {
    pub goal_id: Uuid,
    pub name: String,
    pub group: Option<String>,
    pub estimated_amount: Decimal,
}

/// Add an item to a goal. Naming a group the goal does not know yet
/// registers it on the goal.
pub fn add_goal_item(store: &mut Store, input: NewGoalItem) -> CoreResult<Uuid> {
    if input.name.trim().is_empty() {
        return Err(CoreError::validation("Item name must not be empty"));
    }
    if input.estimated_amount < Decimal::ZERO {
        return Err(CoreError::validation(
            "Estimated amount must not be negative",
        ));
    }
    store.require_goal(input.goal_id)?;

    let mut touched = vec![Collection::GoalItems];
    if let Some(group) = &input.group {
        let goal = store
            .goals
            .iter_mut()
            .find(|g| g.id == input.goal_id)
            .ok_or_else(|| CoreError::GoalNotFound {
                id: input.goal_id.to_string(),
            })?;
        if !goal.groups.contains(group) {
            goal.groups.push(group.clone());
            touched.push(Collection::Goals);
        }
    }

    let item = GoalItem {
        id: Uuid::new_v4(),
        goal_id: input.goal_id,
        name: input.name,
        group: input.group,
        estimated_amount: input.estimated_amount,
    };
    let id = item.id;
    store.goal_items.push(item);
    store.persist(&touched)?;
    Ok(id)
}

/// Remove an item, unlinking any payments made toward it.
/// The payments stay in the ledger as plain expenses.
pub fn remove_goal_item(store: &mut Store, item_id: Uuid) -> CoreResult<()> {
    if store.goal_item(item_id).is_none() {
        return Err(CoreError::GoalItemNotFound {
            id: item_id.to_string(),
        });
    }
    store.goal_items.retain(|i| i.id != item_id);
    let mut txns_touched = false;
    for txn in &mut store.transactions {
        if txn.goal_item_id == Some(item_id) {
            txn.goal_item_id = None;
            txns_touched = true;
        }
    }
    let mut touched = vec![Collection::GoalItems];
    if txns_touched {
        touched.push(Collection::Transactions);
    }
    store.persist(&touched)?;
    Ok(())
}

/// Delete a goal along with its items, unlinking payments
pub fn delete_goal(store: &mut Store, goal_id: Uuid) -> CoreResult<()> {
    store.require_goal(goal_id)?;
    let item_ids: Vec<Uuid> = store
        .goal_items
        .iter()
        .filter(|i| i.goal_id == goal_id)
        .map(|i| i.id)
        .collect();

    store.goals.retain(|g| g.id != goal_id);
    store.goal_items.retain(|i| i.goal_id != goal_id);
    let mut txns_touched = false;
    for txn in &mut store.transactions {
        if let Some(item_id) = txn.goal_item_id {
            if item_ids.contains(&item_id) {
                txn.goal_item_id = None;
                txns_touched = true;
            }
        }
    }

    let mut touched = vec![Collection::Goals, Collection::GoalItems];
    if txns_touched {
        touched.push(Collection::Transactions);
    }
    store.persist(&touched)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{create_transaction, create_wallet, delete_transaction, NewTransaction, NewWallet};
    use crate::models::{Member, TxnKind, TxnStatus, WalletKind};
    use chrono::NaiveDate;
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

    fn setup() -> (Store, Uuid) {
        let mut store = Store::in_memory(&members());
        let wallet_id = create_wallet(
            &mut store,
            NewWallet {
                name: "Checking".to_string(),
                kind: WalletKind::Bank,
                owner: Owner::Joint,
                initial_balance: dec!(10000000),
                bank_name: None,
            },
        )
        .unwrap();
        (store, wallet_id)
    }

    fn pay_item(store: &mut Store, wallet_id: Uuid, item_id: Uuid, amount: Decimal) -> Uuid {
        create_transaction(
            store,
            NewTransaction {
                amount,
                kind: TxnKind::Expense,
                wallet_id,
                category_id: None,
                date: d(2024, 3, 5),
                description: "goal payment".to_string(),
                created_by: "m1".to_string(),
                status: TxnStatus::Completed,
                goal_item_id: Some(item_id),
            },
        )
        .unwrap()
    }

    #[test]
    fn goal_progress_is_derived_from_linked_payments() {
        let (mut store, wallet_id) = setup();
        let goal_id = create_goal(
            &mut store,
            NewGoal {
                name: "New apartment".to_string(),
                owner: Owner::Joint,
                target_date: None,
                visibility: Visibility::Shared,
                theme: None,
                groups: vec![],
            },
        )
        .unwrap();
        let sofa = add_goal_item(
            &mut store,
            NewGoalItem {
                goal_id,
                name: "Sofa".to_string(),
                group: Some("Living room".to_string()),
                estimated_amount: dec!(5000000),
            },
        )
        .unwrap();
        pay_item(&mut store, wallet_id, sofa, dec!(2000000));
        pay_item(&mut store, wallet_id, sofa, dec!(1500000));

        let detail = goal_detail(&store, goal_id, "m1").unwrap();
        assert_eq!(detail.items[0].actual_amount, 3500000.0);
        assert!((detail.items[0].progress - 70.0).abs() < 0.01);
        assert_eq!(detail.goal.total_actual, 3500000.0);
        assert_eq!(detail.payments.len(), 2);
    }

    #[test]
    fn deleting_a_payment_rewinds_the_rollup() {
        let (mut store, wallet_id) = setup();
        let goal_id = create_goal(
            &mut store,
            NewGoal {
                name: "Trip".to_string(),
                owner: Owner::Joint,
                target_date: None,
                visibility: Visibility::Shared,
                theme: None,
                groups: vec![],
            },
        )
        .unwrap();
        let item = add_goal_item(
            &mut store,
            NewGoalItem {
                goal_id,
                name: "Flights".to_string(),
                group: None,
                estimated_amount: dec!(1000),
            },
        )
        .unwrap();
        let txn_id = pay_item(&mut store, wallet_id, item, dec!(400));

        delete_transaction(&mut store, txn_id).unwrap();
        let detail = goal_detail(&store, goal_id, "m1").unwrap();
        assert_eq!(detail.items[0].actual_amount, 0.0);
        assert!(detail.payments.is_empty());
    }

    #[test]
    fn private_goal_is_hidden_from_other_members() {
        let (mut store, _) = setup();
        let goal_id = create_goal(
            &mut store,
            NewGoal {
                name: "Surprise gift".to_string(),
                owner: Owner::Member("m1".to_string()),
                target_date: None,
                visibility: Visibility::Private,
                theme: None,
                groups: vec![],
            },
        )
        .unwrap();

        assert!(goal_detail(&store, goal_id, "m1").is_ok());
        assert!(matches!(
            goal_detail(&store, goal_id, "m2"),
            Err(CoreError::Unauthorized)
        ));
        assert!(goal_list(&store, "m2").unwrap().is_empty());
        assert_eq!(goal_list(&store, "m1").unwrap().len(), 1);
    }

    #[test]
    fn new_group_names_register_on_the_goal() {
        let (mut store, _) = setup();
        let goal_id = create_goal(
            &mut store,
            NewGoal {
                name: "Apartment".to_string(),
                owner: Owner::Joint,
                target_date: None,
                visibility: Visibility::Shared,
                theme: None,
                groups: vec!["Kitchen".to_string()],
            },
        )
        .unwrap();
        add_goal_item(
            &mut store,
            NewGoalItem {
                goal_id,
                name: "Desk".to_string(),
                group: Some("Office".to_string()),
                estimated_amount: dec!(100),
            },
        )
        .unwrap();

        let goal = store.require_goal(goal_id).unwrap();
        assert_eq!(goal.groups, vec!["Kitchen", "Office"]);
    }

    #[test]
    fn deleting_a_goal_unlinks_payments_but_keeps_them() {
        let (mut store, wallet_id) = setup();
        let goal_id = create_goal(
            &mut store,
            NewGoal {
                name: "Trip".to_string(),
                owner: Owner::Joint,
                target_date: None,
                visibility: Visibility::Shared,
                theme: None,
                groups: vec![],
            },
        )
        .unwrap();
        let item = add_goal_item(
            &mut store,
            NewGoalItem {
                goal_id,
                name: "Hotel".to_string(),
                group: None,
                estimated_amount: dec!(800),
            },
        )
        .unwrap();
        let txn_id = pay_item(&mut store, wallet_id, item, dec!(300));

        delete_goal(&mut store, goal_id).unwrap();
        assert!(store.goal(goal_id).is_none());
        assert!(store.goal_item(item).is_none());
        let txn = store.require_transaction(txn_id).unwrap();
        assert!(txn.goal_item_id.is_none());
    }
}
