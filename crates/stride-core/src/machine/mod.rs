//! The entity CRUD state machine.
//!
//! Every entity type shares one generic machine instead of a hand-written
//! copy per type. The pieces:
//!
//! - **[`Action`]** — a CRUD [`Kind`] at a [`Phase`] (REQUEST, SUCCESS,
//!   FAILURE) with the phase's payload. `REQUEST(kind)` marks the start of
//!   an async operation; exactly one of `SUCCESS(kind)`/`FAILURE(kind)`
//!   settles it.
//! - **[`EntityState`]** — the per-type slice the UI renders from: the
//!   loaded list, the detail record, the pagination total, and the
//!   `loading`/`updating`/`update_success`/`error_message` flags.
//! - **[`reduce`]** — the pure transition function. No IO, no clock;
//!   given the same state and action it always yields the same next state,
//!   and re-applying a SUCCESS is a no-op change-wise.
//!
//! Flow: a view dispatches an intent → the owning service journals
//! `REQUEST(kind)` and performs the HTTP call → the completion is applied
//! as `SUCCESS`/`FAILURE` → subscribers see the new state. In-flight
//! bookkeeping (stale-response fencing) lives in [`crate::store`], not
//! here, so the reducer stays total and trivially testable.

pub mod action;
pub mod state;

pub use action::{Action, Kind, KindClass, Outcome, Phase};
pub use state::{EntityState, reduce};
