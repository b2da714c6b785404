// ── Entity slice state and the pure reducer ──

use super::action::{Action, Kind, KindClass, Outcome, Phase};

/// Per-entity-type state slice driving list, detail, and form views.
///
/// `entities` and `entity` are independently owned: a detail fetch never
/// touches the list, a list fetch never touches the detail record.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    /// Records loaded for the list view, in server response order.
    pub entities: Vec<E>,
    /// Record loaded for the detail/edit view.
    pub entity: Option<E>,
    /// Server-reported total for pagination; usually exceeds
    /// `entities.len()`.
    pub total_items: u64,
    /// A read (fetch list/one) is in flight.
    pub loading: bool,
    /// A write (create/update/delete) is in flight.
    pub updating: bool,
    /// The most recent write settled successfully. Cleared by any new
    /// REQUEST, so it is observable for exactly one settle-to-request
    /// window.
    pub update_success: bool,
    /// Message from the most recent failure. Cleared by any new REQUEST,
    /// so a user-initiated retry never shows a stale error.
    pub error_message: Option<String>,
}

impl<E> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            entity: None,
            total_items: 0,
            loading: false,
            updating: false,
            update_success: false,
            error_message: None,
        }
    }
}

impl<E> EntityState<E> {
    /// Neither a read nor a write is in flight.
    pub fn is_at_rest(&self) -> bool {
        !self.loading && !self.updating
    }
}

/// Apply one action to a state, yielding the next state.
///
/// Pure and total: no IO, no clock, no randomness. Re-applying the same
/// SUCCESS yields the same state again (safe under at-least-once
/// delivery).
pub fn reduce<E>(state: EntityState<E>, action: Action<E>) -> EntityState<E> {
    let mut next = state;
    match action.phase {
        Phase::Request => {
            next.error_message = None;
            next.update_success = false;
            match action.kind.class() {
                KindClass::Read => next.loading = true,
                KindClass::Write => next.updating = true,
            }
        }

        Phase::Failure(message) => {
            match action.kind.class() {
                KindClass::Read => next.loading = false,
                KindClass::Write => next.updating = false,
            }
            next.update_success = false;
            next.error_message = Some(message);
        }

        Phase::Success(outcome) => match (action.kind, outcome) {
            (
                Kind::FetchList,
                Outcome::List {
                    entities,
                    total_items,
                },
            ) => {
                next.loading = false;
                next.entities = entities;
                next.total_items = total_items;
            }
            (Kind::FetchOne, Outcome::One(record)) => {
                next.loading = false;
                next.entity = Some(record);
            }
            (Kind::Create | Kind::Update, Outcome::One(record)) => {
                next.updating = false;
                next.update_success = true;
                next.entity = Some(record);
            }
            // Delete discards whatever payload the server sent back.
            (Kind::Delete, _) => {
                next.updating = false;
                next.update_success = true;
            }
            // A payload shape that does not match its kind still settles
            // the operation; loaded data is left untouched.
            (kind, _) => match kind.class() {
                KindClass::Read => next.loading = false,
                KindClass::Write => {
                    next.updating = false;
                    next.update_success = true;
                }
            },
        },
    }
    next
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::UserInfo;

    const ALL_KINDS: [Kind; 5] = [
        Kind::FetchList,
        Kind::FetchOne,
        Kind::Create,
        Kind::Update,
        Kind::Delete,
    ];

    fn member(id: i64, login: &str) -> UserInfo {
        UserInfo {
            id: Some(id),
            login: login.into(),
            nickname: None,
            email: None,
            status: crate::model::UserStatus::Active,
            group_id: None,
            joined_date: None,
        }
    }

    fn initial() -> EntityState<UserInfo> {
        EntityState::default()
    }

    #[test]
    fn initial_state_is_at_rest() {
        let state = initial();
        assert!(state.is_at_rest());
        assert!(state.entities.is_empty());
        assert!(state.entity.is_none());
        assert_eq!(state.total_items, 0);
        assert!(!state.update_success);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn request_raises_exactly_one_base_flag() {
        for kind in ALL_KINDS {
            let next = reduce(initial(), Action::request(kind));
            assert_eq!(next.loading, kind.is_read(), "loading for {kind:?}");
            assert_eq!(next.updating, kind.is_write(), "updating for {kind:?}");
        }
    }

    #[test]
    fn request_clears_previous_error_and_success() {
        for kind in ALL_KINDS {
            let mut stale = initial();
            stale.error_message = Some("old failure".into());
            stale.update_success = true;

            let next = reduce(stale, Action::request(kind));
            assert_eq!(next.error_message, None, "error cleared for {kind:?}");
            assert!(!next.update_success, "success cleared for {kind:?}");
        }
    }

    #[test]
    fn failure_clears_base_flag_and_stores_message() {
        for kind in ALL_KINDS {
            let in_flight = reduce(initial(), Action::request(kind));
            let next = reduce(in_flight, Action::failure(kind, "boom"));

            assert!(next.is_at_rest(), "flags cleared for {kind:?}");
            assert_eq!(next.error_message.as_deref(), Some("boom"));
            assert!(!next.update_success);
        }
    }

    #[test]
    fn fetch_list_success_stores_entities_and_total() {
        let in_flight = reduce(initial(), Action::request(Kind::FetchList));
        let next = reduce(
            in_flight,
            Action::success(
                Kind::FetchList,
                Outcome::List {
                    entities: vec![member(1, "ada"), member(2, "grace")],
                    total_items: 123,
                },
            ),
        );

        assert!(!next.loading);
        assert_eq!(next.entities.len(), 2);
        assert_eq!(next.total_items, 123);
        // List fetch never touches the detail record.
        assert!(next.entity.is_none());
    }

    #[test]
    fn fetch_one_success_stores_detail_only() {
        let mut in_flight = reduce(initial(), Action::request(Kind::FetchOne));
        in_flight.entities = vec![member(1, "ada")];

        let next = reduce(
            in_flight,
            Action::success(Kind::FetchOne, Outcome::One(member(7, "grace"))),
        );

        assert!(!next.loading);
        assert_eq!(next.entity, Some(member(7, "grace")));
        // Detail fetch never touches the list.
        assert_eq!(next.entities, vec![member(1, "ada")]);
    }

    #[test]
    fn create_success_marks_update_success_and_stores_entity() {
        let in_flight = reduce(initial(), Action::request(Kind::Create));
        let next = reduce(
            in_flight,
            Action::success(Kind::Create, Outcome::One(member(9, "ada"))),
        );

        assert!(!next.updating);
        assert!(next.update_success);
        assert_eq!(next.entity, Some(member(9, "ada")));
    }

    #[test]
    fn update_success_behaves_like_create() {
        let in_flight = reduce(initial(), Action::request(Kind::Update));
        let next = reduce(
            in_flight,
            Action::success(Kind::Update, Outcome::One(member(9, "ada"))),
        );

        assert!(!next.updating);
        assert!(next.update_success);
        assert_eq!(next.entity, Some(member(9, "ada")));
    }

    #[test]
    fn delete_success_discards_any_payload() {
        for outcome in [Outcome::Deleted, Outcome::One(member(1, "ada"))] {
            let in_flight = reduce(initial(), Action::request(Kind::Delete));
            let next = reduce(in_flight, Action::success(Kind::Delete, outcome));

            assert!(!next.updating);
            assert!(next.update_success);
            assert!(next.entity.is_none(), "delete must not load a record");
        }
    }

    #[test]
    fn success_is_idempotent() {
        let success = Action::success(
            Kind::FetchList,
            Outcome::List {
                entities: vec![member(1, "ada")],
                total_items: 1,
            },
        );

        let once = reduce(initial(), success.clone());
        let twice = reduce(once.clone(), success);
        assert_eq!(once, twice);

        let saved = Action::success(Kind::Create, Outcome::One(member(2, "grace")));
        let once = reduce(initial(), saved.clone());
        let twice = reduce(once.clone(), saved);
        assert_eq!(once, twice);
    }

    #[test]
    fn failed_write_leaves_loaded_data_untouched() {
        let mut seeded = initial();
        seeded.entities = vec![member(1, "ada")];
        seeded.entity = Some(member(1, "ada"));
        seeded.total_items = 40;

        let in_flight = reduce(seeded, Action::request(Kind::Delete));
        let next = reduce(in_flight, Action::failure(Kind::Delete, "denied"));

        assert_eq!(next.entities, vec![member(1, "ada")]);
        assert_eq!(next.entity, Some(member(1, "ada")));
        assert_eq!(next.total_items, 40);
        assert_eq!(next.error_message.as_deref(), Some("denied"));
    }

    #[test]
    fn action_names_follow_the_wire_contract() {
        let request: Action<UserInfo> = Action::request(Kind::FetchList);
        assert_eq!(request.name(), "FETCH_LIST_REQUEST");

        let failure: Action<UserInfo> = Action::failure(Kind::Delete, "x");
        assert_eq!(failure.name(), "DELETE_FAILURE");

        let success: Action<UserInfo> = Action::success(Kind::Create, Outcome::Deleted);
        assert_eq!(success.name(), "CREATE_SUCCESS");
    }
}
