// stride-core: Reactive CRUD layer between stride-api and consumers (CLI/TUI).

pub mod account;
pub mod config;
pub mod console;
pub mod error;
pub mod machine;
pub mod model;
pub mod service;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use account::{AccountAction, AccountOp, AccountService, AccountState, reduce_account};
pub use config::{ClientConfig, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use machine::{Action, EntityState, Kind, KindClass, Outcome, Phase, reduce};
pub use service::EntityService;
pub use store::{AdminStore, Dispatch, StateStream};

// Paging types come straight from the transport crate.
pub use stride_api::{Page, PageQuery};

// Re-export model types at the crate root for ergonomics.
pub use model::{Account, Entity, EntityId, RunningGroup, RunningRecord, UserInfo, UserStatus};
