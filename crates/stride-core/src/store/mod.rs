// ── Reactive admin store ──
//
// One slice per entity type plus the account slice, reduced through the
// pure state machine and broadcast to subscribers via `watch` channels.

pub(crate) mod slice;
mod stream;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::account::AccountState;
use crate::machine::EntityState;
use crate::model::{RunningGroup, RunningRecord, UserInfo};
use slice::{AccountSlice, Slice};

pub use stream::{StateStream, StateWatchStream};

/// Capacity of the dispatch journal. Lagging observers drop the oldest
/// records, never block a dispatch.
const JOURNAL_CAPACITY: usize = 256;

/// Journal record of one applied action, e.g. `userInfo/CREATE_SUCCESS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Slice tag, e.g. `userInfo` or `account`.
    pub slice: &'static str,
    /// Phase-qualified action name, e.g. `CREATE_SUCCESS`.
    pub name: String,
}

impl Dispatch {
    pub(crate) fn new(slice: &'static str, name: String) -> Self {
        Self { slice, name }
    }

    /// Full wire tag, e.g. `userInfo/CREATE_SUCCESS`.
    #[must_use]
    pub fn type_tag(&self) -> String {
        format!("{}/{}", self.slice, self.name)
    }
}

/// Central reactive store behind the admin console.
///
/// Instances are plain values handed to whoever needs them; nothing here
/// is process-global. Every applied action is also published on a
/// broadcast journal so observers can assert or log dispatch order.
pub struct AdminStore {
    pub(crate) members: Arc<Slice<UserInfo>>,
    pub(crate) records: Arc<Slice<RunningRecord>>,
    pub(crate) groups: Arc<Slice<RunningGroup>>,
    pub(crate) account: Arc<AccountSlice>,
    journal: broadcast::Sender<Dispatch>,
}

impl AdminStore {
    pub fn new() -> Self {
        let (journal, _) = broadcast::channel(JOURNAL_CAPACITY);

        Self {
            members: Arc::new(Slice::new(journal.clone())),
            records: Arc::new(Slice::new(journal.clone())),
            groups: Arc::new(Slice::new(journal.clone())),
            account: Arc::new(AccountSlice::new(journal.clone())),
            journal,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn members_state(&self) -> EntityState<UserInfo> {
        self.members.snapshot()
    }

    pub fn records_state(&self) -> EntityState<RunningRecord> {
        self.records.snapshot()
    }

    pub fn groups_state(&self) -> EntityState<RunningGroup> {
        self.groups.snapshot()
    }

    pub fn account_state(&self) -> AccountState {
        self.account.snapshot()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_members(&self) -> StateStream<EntityState<UserInfo>> {
        StateStream::new(self.members.subscribe())
    }

    pub fn subscribe_records(&self) -> StateStream<EntityState<RunningRecord>> {
        StateStream::new(self.records.subscribe())
    }

    pub fn subscribe_groups(&self) -> StateStream<EntityState<RunningGroup>> {
        StateStream::new(self.groups.subscribe())
    }

    pub fn subscribe_account(&self) -> StateStream<AccountState> {
        StateStream::new(self.account.subscribe())
    }

    /// Subscribe to the ordered journal of applied actions.
    pub fn subscribe_dispatches(&self) -> broadcast::Receiver<Dispatch> {
        self.journal.subscribe()
    }
}

impl Default for AdminStore {
    fn default() -> Self {
        Self::new()
    }
}
