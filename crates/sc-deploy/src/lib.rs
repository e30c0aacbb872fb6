//! sc-deploy - Change history ledger and deploy driver for snowchange
//!
//! [`Deployer`] reads the change history through [`ChangeHistory`], discovers
//! change scripts with `sc-core`, and applies the pending ones through an
//! `sc-db` [`Database`](sc_db::Database).

pub mod driver;
pub mod error;
pub mod ledger;

pub use driver::{DeployConfig, DeployHooks, DeployOutcome, Deployer, NoopHooks};
pub use error::{DeployError, DeployResult};
pub use ledger::{ChangeHistory, ChangeHistoryEntry, ChangeStatus};
