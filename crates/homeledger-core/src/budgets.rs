//! Per-member monthly spending budgets
//!
//! A budget is a set of named groups, each capping a list of expense
//! categories for one `YYYY-MM` period. Spending is attributed to the member
//! who recorded the entry, so joint wallets don't double-count.

use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{parse_period_month, BudgetGroup, MonthlyBudget, TxnKind};
use crate::reports::{money, BudgetGroupSummary, BudgetSummary};
use crate::store::{Collection, Store};

/// Input for creating or replacing a monthly budget
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub member_id: String,
    /// `YYYY-MM`
    pub period: String,
    pub groups: Vec<BudgetGroup>,
}

/// Create or replace the budget for one member and period
pub fn upsert_budget(store: &mut Store, input: NewBudget) -> CoreResult<Uuid> {
    store.require_member(&input.member_id)?;
    parse_period_month(&input.period).map_err(CoreError::validation)?;
    if input.groups.is_empty() {
        return Err(CoreError::validation(
            "A budget needs at least one spending group",
        ));
    }

    let mut seen = HashSet::new();
    for group in &input.groups {
        if group.name.trim().is_empty() {
            return Err(CoreError::validation("Group name must not be empty"));
        }
        if !seen.insert(group.name.clone()) {
            return Err(CoreError::validation(format!(
                "Duplicate group name: {}",
                group.name
            )));
        }
        if group.limit < Decimal::ZERO {
            return Err(CoreError::validation(format!(
                "Group '{}' has a negative limit",
                group.name
            )));
        }
        for category_id in &group.category_ids {
            let category = store
                .category(*category_id)
                .ok_or_else(|| CoreError::CategoryNotFound {
                    id: category_id.to_string(),
                })?;
            if category.kind != TxnKind::Expense {
                return Err(CoreError::validation(format!(
                    "Category '{}' is not an expense category",
                    category.name
                )));
            }
        }
    }

    store
        .monthly_budgets
        .retain(|b| !(b.member_id == input.member_id && b.period == input.period));
    let budget = MonthlyBudget {
        id: Uuid::new_v4(),
        member_id: input.member_id,
        period: input.period,
        groups: input.groups,
    };
    let id = budget.id;
    store.monthly_budgets.push(budget);
    store.persist(&[Collection::MonthlyBudgets])?;
    Ok(id)
}

/// Roll the member's recorded spending up against their budget for a period
pub fn budget_summary(store: &Store, member_id: &str, period: &str) -> CoreResult<BudgetSummary> {
    store.require_member(member_id)?;
    let (start, end) = parse_period_month(period).map_err(CoreError::validation)?;
    let budget = store
        .budget_for(member_id, period)
        .ok_or_else(|| CoreError::BudgetNotFound {
            member: member_id.to_string(),
            period: period.to_string(),
        })?;

    let mut total_limit = Decimal::ZERO;
    let mut total_spent = Decimal::ZERO;
    let mut groups = Vec::with_capacity(budget.groups.len());

    for group in &budget.groups {
        let spent: Decimal = store
            .transactions
            .iter()
            .filter(|t| {
                t.is_counted()
                    && !t.is_transfer_leg()
                    && t.kind == TxnKind::Expense
                    && t.created_by == member_id
                    && t.date >= start
                    && t.date <= end
                    && t.category_id
                        .map(|id| group.category_ids.contains(&id))
                        .unwrap_or(false)
            })
            .map(|t| t.amount)
            .sum();

        total_limit += group.limit;
        total_spent += spent;
        let used = if group.limit.is_zero() {
            0.0
        } else {
            money(spent * Decimal::from(100) / group.limit)
        };
        groups.push(BudgetGroupSummary {
            name: group.name.clone(),
            limit: money(group.limit),
            spent: money(spent),
            remaining: money(group.limit - spent),
            used,
        });
    }

    Ok(BudgetSummary {
        member_id: member_id.to_string(),
        period: period.to_string(),
        groups,
        total_limit: money(total_limit),
        total_spent: money(total_spent),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{
        create_category, create_transaction, create_wallet, NewCategory, NewTransaction, NewWallet,
    };
    use crate::models::{BudgetCadence, Flexibility, Member, Owner, TxnStatus, WalletKind};
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

    fn setup() -> (Store, Uuid, Uuid) {
        let mut store = Store::in_memory(&members());
        let wallet_id = create_wallet(
            &mut store,
            NewWallet {
                name: "Joint account".to_string(),
                kind: WalletKind::Bank,
                owner: Owner::Joint,
                initial_balance: dec!(10000),
                bank_name: None,
            },
        )
        .unwrap();
        let category_id = create_category(
            &mut store,
            NewCategory {
                name: "Groceries".to_string(),
                kind: TxnKind::Expense,
                flexibility: Flexibility::Variable,
                budget_group: None,
            },
        )
        .unwrap();
        (store, wallet_id, category_id)
    }

    fn spend(store: &mut Store, wallet_id: Uuid, category_id: Uuid, by: &str, amount: Decimal) {
        create_transaction(
            store,
            NewTransaction {
                amount,
                kind: TxnKind::Expense,
                wallet_id,
                category_id: Some(category_id),
                date: d(2024, 3, 10),
                description: "shopping".to_string(),
                created_by: by.to_string(),
                status: TxnStatus::Completed,
                goal_item_id: None,
            },
        )
        .unwrap();
    }

    fn groceries_budget(category_id: Uuid, limit: Decimal) -> NewBudget {
        NewBudget {
            member_id: "m1".to_string(),
            period: "2024-03".to_string(),
            groups: vec![BudgetGroup {
                name: "Food".to_string(),
                limit,
                cadence: BudgetCadence::Monthly,
                category_ids: vec![category_id],
            }],
        }
    }

    #[test]
    fn summary_tracks_spending_against_the_limit() {
        let (mut store, wallet_id, category_id) = setup();
        upsert_budget(&mut store, groceries_budget(category_id, dec!(500))).unwrap();
        spend(&mut store, wallet_id, category_id, "m1", dec!(150));
        spend(&mut store, wallet_id, category_id, "m1", dec!(50));

        let summary = budget_summary(&store, "m1", "2024-03").unwrap();
        assert_eq!(summary.groups[0].spent, 200.0);
        assert_eq!(summary.groups[0].remaining, 300.0);
        assert_eq!(summary.groups[0].used, 40.0);
        assert_eq!(summary.total_limit, 500.0);
        assert_eq!(summary.total_spent, 200.0);
    }

    #[test]
    fn spending_by_another_member_is_excluded() {
        let (mut store, wallet_id, category_id) = setup();
        upsert_budget(&mut store, groceries_budget(category_id, dec!(500))).unwrap();
        spend(&mut store, wallet_id, category_id, "m2", dec!(300));

        let summary = budget_summary(&store, "m1", "2024-03").unwrap();
        assert_eq!(summary.groups[0].spent, 0.0);
    }

    #[test]
    fn upsert_replaces_the_existing_budget() {
        let (mut store, _, category_id) = setup();
        upsert_budget(&mut store, groceries_budget(category_id, dec!(500))).unwrap();
        upsert_budget(&mut store, groceries_budget(category_id, dec!(800))).unwrap();

        assert_eq!(store.monthly_budgets.len(), 1);
        let summary = budget_summary(&store, "m1", "2024-03").unwrap();
        assert_eq!(summary.groups[0].limit, 800.0);
    }

    #[test]
    fn missing_budget_is_a_typed_not_found() {
        let (store, _, _) = setup();
        assert!(matches!(
            budget_summary(&store, "m1", "2024-03"),
            Err(CoreError::BudgetNotFound { .. })
        ));
    }

    #[test]
    fn malformed_period_and_duplicate_groups_are_rejected() {
        let (mut store, _, category_id) = setup();
        let mut bad_period = groceries_budget(category_id, dec!(500));
        bad_period.period = "2024-3".to_string();
        assert!(matches!(
            upsert_budget(&mut store, bad_period),
            Err(CoreError::ValidationError { .. })
        ));

        let mut duplicated = groceries_budget(category_id, dec!(500));
        duplicated.groups.push(duplicated.groups[0].clone());
        assert!(matches!(
            upsert_budget(&mut store, duplicated),
            Err(CoreError::ValidationError { .. })
        ));
    }

    #[test]
    fn income_category_in_a_group_is_rejected() {
        let (mut store, _, _) = setup();
        let salary = create_category(
            &mut store,
            NewCategory {
                name: "Salary".to_string(),
                kind: TxnKind::Income,
                flexibility: Flexibility::Fixed,
                budget_group: None,
            },
        )
        .unwrap();
        assert!(matches!(
            upsert_budget(&mut store, groceries_budget(salary, dec!(500))),
            Err(CoreError::ValidationError { .. })
        ));
    }
}
