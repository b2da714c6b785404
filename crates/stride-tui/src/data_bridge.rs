//! Data bridge — connects store slices to TUI actions.
//!
//! Runs as a background task: subscribes to every slice of the admin
//! store and forwards each new state snapshot as an [`Action`] through
//! the TUI's action channel. Screens never touch the store directly.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use stride_core::Console;

use crate::action::Action;

/// Forward slice snapshots from the console's store into the action loop.
///
/// Sends the current snapshots immediately so screens have data on the
/// first frame, then loops forwarding every change. Shuts down cleanly
/// on cancellation.
pub async fn run_data_bridge(
    console: Console,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let store = console.store();
    let mut members = store.subscribe_members();
    let mut records = store.subscribe_records();
    let mut groups = store.subscribe_groups();
    let mut account = store.subscribe_account();

    // Initial snapshots so screens render state from frame one
    let _ = action_tx.send(Action::MembersState(members.current().clone()));
    let _ = action_tx.send(Action::RecordsState(records.current().clone()));
    let _ = action_tx.send(Action::GroupsState(groups.current().clone()));
    let _ = action_tx.send(Action::AccountState(account.current().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(state) = members.changed() => {
                let _ = action_tx.send(Action::MembersState(state));
            }
            Some(state) = records.changed() => {
                let _ = action_tx.send(Action::RecordsState(state));
            }
            Some(state) = groups.changed() => {
                let _ = action_tx.send(Action::GroupsState(state));
            }
            Some(state) = account.changed() => {
                let _ = action_tx.send(Action::AccountState(state));
            }
        }
    }

    debug!("data bridge shut down");
}
