// ── Domain model ──
//
// Canonical club entities exactly as the server serves them. The JSON
// wire format is camelCase; ids are server-assigned integers, absent on
// unsaved drafts.

pub mod account;
pub mod entity;
pub mod group;
pub mod member;
pub mod record;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use stride_core::model::*` gives you everything.

pub use account::Account;
pub use entity::{Entity, EntityId};
pub use group::RunningGroup;
pub use member::{UserInfo, UserStatus};
pub use record::RunningRecord;
