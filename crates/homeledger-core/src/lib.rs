//! Core ledger processing and business logic
//!
//! Everything here is synchronous and owns no IO beyond the document store.
//! The API crate wraps a [`store::Store`] in a lock and calls straight into
//! these functions.

pub mod budgets;
pub mod debts;
pub mod error;
pub mod goals;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod routines;
pub mod store;
pub mod time;

pub use error::{CoreError, CoreResult, ErrorCode};
pub use store::{Collection, Store};
pub use time::{LedgerFilter, Period, Preset};
