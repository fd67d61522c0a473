//! JSON document store
//!
//! One JSON array file per collection under the configured data directory.
//! Reads work against the in-memory copy; every mutation persists the touched
//! collections before returning. Multi-document operations (transfer legs,
//! debt settlement, routine generate+advance) run inside a single exclusive
//! borrow and a single `persist` call, so partial writes cannot leak between
//! concurrent requests.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Category, Debt, Goal, GoalItem, Member, MonthlyBudget, Routine, Transaction, Wallet,
};

/// Persisted collection names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Wallets,
    Transactions,
    Categories,
    Goals,
    GoalItems,
    Routines,
    Debts,
    MonthlyBudgets,
    Members,
}

impl Collection {
    /// File name under the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Wallets => "wallets.json",
            Collection::Transactions => "transactions.json",
            Collection::Categories => "categories.json",
            Collection::Goals => "goals.json",
            Collection::GoalItems => "goal_items.json",
            Collection::Routines => "routines.json",
            Collection::Debts => "debts.json",
            Collection::MonthlyBudgets => "monthly_budgets.json",
            Collection::Members => "members.json",
        }
    }

    /// Every collection, in persistence order
    pub fn all() -> &'static [Collection] {
        &[
            Collection::Wallets,
            Collection::Transactions,
            Collection::Categories,
            Collection::Goals,
            Collection::GoalItems,
            Collection::Routines,
            Collection::Debts,
            Collection::MonthlyBudgets,
            Collection::Members,
        ]
    }
}

/// In-memory view of the document store
#[derive(Debug, Default)]
pub struct Store {
    dir: Option<PathBuf>,
    pub wallets: Vec<Wallet>,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub goals: Vec<Goal>,
    pub goal_items: Vec<GoalItem>,
    pub routines: Vec<Routine>,
    pub debts: Vec<Debt>,
    pub monthly_budgets: Vec<MonthlyBudget>,
    pub members: Vec<Member>,
}

impl Store {
    /// Open the store at a directory, creating it when missing.
    /// The configured household members are mirrored into the `members`
    /// collection so reads never need the configuration.
    pub fn open(dir: impl Into<PathBuf>, members: &[Member]) -> CoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut store = Store {
            wallets: load_collection(&dir, Collection::Wallets)?,
            transactions: load_collection(&dir, Collection::Transactions)?,
            categories: load_collection(&dir, Collection::Categories)?,
            goals: load_collection(&dir, Collection::Goals)?,
            goal_items: load_collection(&dir, Collection::GoalItems)?,
            routines: load_collection(&dir, Collection::Routines)?,
            debts: load_collection(&dir, Collection::Debts)?,
            monthly_budgets: load_collection(&dir, Collection::MonthlyBudgets)?,
            members: load_collection(&dir, Collection::Members)?,
            dir: Some(dir),
        };

        if store.members.as_slice() != members {
            store.members = members.to_vec();
            store.persist(&[Collection::Members])?;
        }

        log::info!(
            "store opened: {} wallets, {} transactions, {} routines",
            store.wallets.len(),
            store.transactions.len(),
            store.routines.len()
        );

        Ok(store)
    }

    /// A store with no backing directory; persistence is a no-op.
    /// Used by tests.
    pub fn in_memory(members: &[Member]) -> Self {
        Store {
            members: members.to_vec(),
            ..Store::default()
        }
    }

    /// Persist the given collections with write-to-temp-then-rename
    pub fn persist(&self, collections: &[Collection]) -> CoreResult<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        for collection in collections {
            match collection {
                Collection::Wallets => write_collection(dir, *collection, &self.wallets)?,
                Collection::Transactions => write_collection(dir, *collection, &self.transactions)?,
                Collection::Categories => write_collection(dir, *collection, &self.categories)?,
                Collection::Goals => write_collection(dir, *collection, &self.goals)?,
                Collection::GoalItems => write_collection(dir, *collection, &self.goal_items)?,
                Collection::Routines => write_collection(dir, *collection, &self.routines)?,
                Collection::Debts => write_collection(dir, *collection, &self.debts)?,
                Collection::MonthlyBudgets => {
                    write_collection(dir, *collection, &self.monthly_budgets)?
                }
                Collection::Members => write_collection(dir, *collection, &self.members)?,
            }
        }
        Ok(())
    }

    // ==================== Lookup helpers ====================

    pub fn wallet(&self, id: Uuid) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id && !w.deleted)
    }

    pub fn wallet_mut(&mut self, id: Uuid) -> Option<&mut Wallet> {
        self.wallets.iter_mut().find(|w| w.id == id && !w.deleted)
    }

    /// Wallet lookup that converts absence into a typed error
    pub fn require_wallet(&self, id: Uuid) -> CoreResult<&Wallet> {
        self.wallet(id).ok_or_else(|| CoreError::WalletNotFound {
            id: id.to_string(),
        })
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id && !t.deleted)
    }

    pub fn require_transaction(&self, id: Uuid) -> CoreResult<&Transaction> {
        self.transaction(id)
            .ok_or_else(|| CoreError::TransactionNotFound {
                id: id.to_string(),
            })
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id && !c.deleted)
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn require_goal(&self, id: Uuid) -> CoreResult<&Goal> {
        self.goal(id).ok_or_else(|| CoreError::GoalNotFound {
            id: id.to_string(),
        })
    }

    pub fn goal_item(&self, id: Uuid) -> Option<&GoalItem> {
        self.goal_items.iter().find(|i| i.id == id)
    }

    pub fn routine(&self, id: Uuid) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    pub fn require_routine_mut(&mut self, id: Uuid) -> CoreResult<&mut Routine> {
        self.routines
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::RoutineNotFound {
                id: id.to_string(),
            })
    }

    pub fn debt(&self, id: Uuid) -> Option<&Debt> {
        self.debts.iter().find(|d| d.id == id)
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Validate that an id names a configured household member
    pub fn require_member(&self, id: &str) -> CoreResult<&Member> {
        self.member(id)
            .ok_or_else(|| CoreError::validation(format!("Unknown household member: {}", id)))
    }

    pub fn budget_for(&self, member_id: &str, period: &str) -> Option<&MonthlyBudget> {
        self.monthly_budgets
            .iter()
            .find(|b| b.member_id == member_id && b.period == period)
    }
}

fn load_collection<T: DeserializeOwned>(dir: &Path, collection: Collection) -> CoreResult<Vec<T>> {
    let path = dir.join(collection.file_name());
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let documents = serde_json::from_str(&content)?;
    Ok(documents)
}

fn write_collection<T: Serialize>(
    dir: &Path,
    collection: Collection,
    documents: &[T],
) -> CoreResult<()> {
    let path = dir.join(collection.file_name());
    let tmp = dir.join(format!("{}.tmp", collection.file_name()));
    let content = serde_json::to_string_pretty(documents)?;
    fs::write(&tmp, content)?;
    fs::rename(&tmp, &path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Owner, WalletKind};
    use rust_decimal_macros::dec;

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

    #[test]
    fn open_creates_missing_collections_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), &members()).unwrap();
        assert!(store.wallets.is_empty());
        assert_eq!(store.members.len(), 2);
    }

    #[test]
    fn persisted_documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let wallet_id;
        {
            let mut store = Store::open(dir.path(), &members()).unwrap();
            let wallet = Wallet {
                id: Uuid::new_v4(),
                name: "Checking".to_string(),
                kind: WalletKind::Bank,
                owner: Owner::Member("m1".to_string()),
                initial_balance: dec!(1000),
                bank_name: Some("First Bank".to_string()),
                deleted: false,
            };
            wallet_id = wallet.id;
            store.wallets.push(wallet);
            store.persist(&[Collection::Wallets]).unwrap();
        }
        let store = Store::open(dir.path(), &members()).unwrap();
        let wallet = store.wallet(wallet_id).unwrap();
        assert_eq!(wallet.name, "Checking");
        assert_eq!(wallet.initial_balance, dec!(1000));
    }

    #[test]
    fn soft_deleted_wallets_are_invisible_to_lookup() {
        let mut store = Store::in_memory(&members());
        let id = Uuid::new_v4();
        store.wallets.push(Wallet {
            id,
            name: "Old cash".to_string(),
            kind: WalletKind::Cash,
            owner: Owner::Joint,
            initial_balance: dec!(0),
            bank_name: None,
            deleted: true,
        });
        assert!(store.wallet(id).is_none());
        assert!(store.require_wallet(id).is_err());
    }

    #[test]
    fn unknown_member_is_a_validation_error() {
        let store = Store::in_memory(&members());
        assert!(matches!(
            store.require_member("stranger"),
            Err(CoreError::ValidationError { .. })
        ));
    }
}
