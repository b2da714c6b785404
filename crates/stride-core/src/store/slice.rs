// ── Reactive slices with stale-response fencing ──
//
// A slice owns one watched state value and applies actions through the
// pure reducer. Requests register in a per-lane sequence counter; a
// completion only lands if its token is still the lane's newest. A
// dropped stale completion is safe because the superseding request's own
// completion settles the flags.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::account::{AccountAction, AccountOp, AccountState, reduce_account};
use crate::machine::{Action, EntityState, Kind, KindClass, reduce};
use crate::model::Entity;
use crate::store::Dispatch;

/// Proof that a request was registered with its slice. Carried across
/// the HTTP call and presented back when the operation settles.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestToken {
    lane: KindClass,
    seq: u64,
}

// ── Entity slice ─────────────────────────────────────────────────────

pub(crate) struct Slice<E: Entity> {
    state: watch::Sender<EntityState<E>>,
    /// Monotonic per-lane counters. Reads and writes race independently
    /// because they drive independent flags.
    read_seq: AtomicU64,
    write_seq: AtomicU64,
    journal: broadcast::Sender<Dispatch>,
}

impl<E: Entity> Slice<E> {
    pub(crate) fn new(journal: broadcast::Sender<Dispatch>) -> Self {
        let (state, _) = watch::channel(EntityState::default());
        Self {
            state,
            read_seq: AtomicU64::new(0),
            write_seq: AtomicU64::new(0),
            journal,
        }
    }

    /// Journal and apply a REQUEST, returning the token its completion
    /// must present.
    pub(crate) fn begin(&self, kind: Kind) -> RequestToken {
        let lane = kind.class();
        let seq = self.lane_counter(lane).fetch_add(1, Ordering::SeqCst) + 1;
        self.apply(Action::request(kind));
        RequestToken { lane, seq }
    }

    /// Apply a SUCCESS/FAILURE if `token` is still the newest request in
    /// its lane. Returns whether the action was applied.
    pub(crate) fn settle(&self, token: RequestToken, action: Action<E>) -> bool {
        let current = self.lane_counter(token.lane).load(Ordering::SeqCst);
        if token.seq != current {
            warn!(
                slice = E::TYPE_TAG,
                action = %action.name(),
                held = token.seq,
                current,
                "dropping stale completion"
            );
            return false;
        }
        self.apply(action);
        true
    }

    /// Apply an action unconditionally and journal it.
    pub(crate) fn apply(&self, action: Action<E>) {
        let record = Dispatch::new(E::TYPE_TAG, action.name());
        debug!(action = %record.type_tag(), "dispatch");

        let next = reduce(self.state.borrow().clone(), action);
        self.state.send_replace(next);
        // Journal after the state lands so observers read what they were
        // just told about. Send errors only mean nobody is listening.
        let _ = self.journal.send(record);
    }

    pub(crate) fn snapshot(&self) -> EntityState<E> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<EntityState<E>> {
        self.state.subscribe()
    }

    fn lane_counter(&self, lane: KindClass) -> &AtomicU64 {
        match lane {
            KindClass::Read => &self.read_seq,
            KindClass::Write => &self.write_seq,
        }
    }
}

// ── Account slice ────────────────────────────────────────────────────
//
// Same fencing discipline, reduced shape: the account machine has its
// own action set (load/save/reset) and no list.

pub(crate) struct AccountSlice {
    state: watch::Sender<AccountState>,
    read_seq: AtomicU64,
    write_seq: AtomicU64,
    journal: broadcast::Sender<Dispatch>,
}

impl AccountSlice {
    pub(crate) const TYPE_TAG: &'static str = "account";

    pub(crate) fn new(journal: broadcast::Sender<Dispatch>) -> Self {
        let (state, _) = watch::channel(AccountState::default());
        Self {
            state,
            read_seq: AtomicU64::new(0),
            write_seq: AtomicU64::new(0),
            journal,
        }
    }

    pub(crate) fn begin(&self, op: AccountOp) -> RequestToken {
        let lane = op.class();
        let seq = self.lane_counter(lane).fetch_add(1, Ordering::SeqCst) + 1;
        self.apply(AccountAction::Request(op));
        RequestToken { lane, seq }
    }

    pub(crate) fn settle(&self, token: RequestToken, action: AccountAction) -> bool {
        let current = self.lane_counter(token.lane).load(Ordering::SeqCst);
        if token.seq != current {
            warn!(
                slice = Self::TYPE_TAG,
                action = %action.name(),
                held = token.seq,
                current,
                "dropping stale completion"
            );
            return false;
        }
        self.apply(action);
        true
    }

    pub(crate) fn apply(&self, action: AccountAction) {
        let record = Dispatch::new(Self::TYPE_TAG, action.name());
        debug!(action = %record.type_tag(), "dispatch");

        let next = reduce_account(self.state.borrow().clone(), action);
        self.state.send_replace(next);
        let _ = self.journal.send(record);
    }

    pub(crate) fn snapshot(&self) -> AccountState {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<AccountState> {
        self.state.subscribe()
    }

    fn lane_counter(&self, lane: KindClass) -> &AtomicU64 {
        match lane {
            KindClass::Read => &self.read_seq,
            KindClass::Write => &self.write_seq,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::machine::Outcome;
    use crate::model::{UserInfo, UserStatus};

    fn member(id: i64, login: &str) -> UserInfo {
        UserInfo {
            id: Some(id),
            login: login.into(),
            nickname: None,
            email: None,
            status: UserStatus::Active,
            group_id: None,
            joined_date: None,
        }
    }

    fn list_success(logins: &[(i64, &str)], total: u64) -> Action<UserInfo> {
        Action::success(
            Kind::FetchList,
            Outcome::List {
                entities: logins.iter().map(|(id, l)| member(*id, l)).collect(),
                total_items: total,
            },
        )
    }

    fn slice() -> (Slice<UserInfo>, broadcast::Receiver<Dispatch>) {
        let (journal, rx) = broadcast::channel(64);
        (Slice::new(journal), rx)
    }

    #[test]
    fn begin_then_settle_applies_completion() {
        let (slice, _rx) = slice();

        let token = slice.begin(Kind::FetchList);
        assert!(slice.snapshot().loading);

        let applied = slice.settle(token, list_success(&[(1, "ada")], 1));
        assert!(applied);

        let snap = slice.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.entities.len(), 1);
    }

    #[test]
    fn superseded_completion_is_dropped() {
        let (slice, _rx) = slice();

        let first = slice.begin(Kind::FetchList);
        let second = slice.begin(Kind::FetchList);

        // The older request resolves after the newer one started.
        let applied = slice.settle(first, list_success(&[(1, "stale")], 1));
        assert!(!applied);

        let snap = slice.snapshot();
        assert!(snap.loading, "newest request still in flight");
        assert!(snap.entities.is_empty());

        let applied = slice.settle(second, list_success(&[(2, "fresh")], 1));
        assert!(applied);
        assert_eq!(slice.snapshot().entities[0].login, "fresh");
    }

    #[test]
    fn read_and_write_lanes_fence_independently() {
        let (slice, _rx) = slice();

        let read = slice.begin(Kind::FetchList);
        let write = slice.begin(Kind::Delete);

        // The write starting later must not invalidate the read.
        assert!(slice.settle(read, list_success(&[(1, "ada")], 1)));
        assert!(slice.settle(write, Action::success(Kind::Delete, Outcome::Deleted)));

        let snap = slice.snapshot();
        assert!(snap.is_at_rest());
        assert!(snap.update_success);
    }

    #[test]
    fn journal_preserves_dispatch_order() {
        let (slice, mut rx) = slice();

        let token = slice.begin(Kind::Create);
        slice.settle(token, Action::success(Kind::Create, Outcome::One(member(1, "ada"))));

        assert_eq!(rx.try_recv().unwrap().type_tag(), "userInfo/CREATE_REQUEST");
        assert_eq!(rx.try_recv().unwrap().type_tag(), "userInfo/CREATE_SUCCESS");
        assert!(rx.try_recv().is_err(), "no further dispatches expected");
    }

    #[test]
    fn stale_failure_is_dropped_too() {
        let (slice, _rx) = slice();

        let first = slice.begin(Kind::FetchOne);
        let second = slice.begin(Kind::FetchOne);

        assert!(!slice.settle(first, Action::failure(Kind::FetchOne, "old timeout")));
        assert!(slice.snapshot().error_message.is_none());

        assert!(slice.settle(second, Action::success(Kind::FetchOne, Outcome::One(member(7, "g")))));
        assert_eq!(slice.snapshot().entity.unwrap().id, Some(7));
    }
}
