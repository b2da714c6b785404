//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use stride_core::{
    Account, AccountState, EntityId, EntityState, PageQuery, RunningGroup, RunningRecord, UserInfo,
    UserStatus,
};

use crate::screen::ScreenId;

/// Pending confirmation action. The app holds at most one at a time and
/// renders it as a modal dialog; `y` converts it into its intent.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteMember { id: EntityId, name: String },
    ChangeMemberStatus { member: Box<UserInfo>, to: UserStatus },
    DeleteRecord { id: EntityId, label: String },
    VerifyRecord { record: Box<RunningRecord> },
    DeleteGroup { id: EntityId, name: String },
}

impl ConfirmAction {
    /// The intent dispatched when the operator answers yes.
    pub fn accept(self) -> Action {
        match self {
            Self::DeleteMember { id, .. } => Action::DeleteMember(id),
            Self::ChangeMemberStatus { mut member, to } => {
                member.status = to;
                Action::SaveMember(member)
            }
            Self::DeleteRecord { id, .. } => Action::DeleteRecord(id),
            Self::VerifyRecord { mut record } => {
                record.verified = true;
                Action::SaveRecord(record)
            }
            Self::DeleteGroup { id, .. } => Action::DeleteGroup(id),
        }
    }
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteMember { name, .. } => {
                write!(f, "Delete member {name}? This cannot be undone.")
            }
            Self::ChangeMemberStatus { member, to } => {
                write!(f, "Change status of {} to {to}?", member.display_name())
            }
            Self::DeleteRecord { label, .. } => {
                write!(f, "Delete record {label}? This cannot be undone.")
            }
            Self::VerifyRecord { record } => {
                write!(f, "Mark record #{} as verified?", record.id.unwrap_or(0))
            }
            Self::DeleteGroup { name, .. } => {
                write!(f, "Delete group {name}? This cannot be undone.")
            }
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data Snapshots (from the store, via the data bridge) ──────
    MembersState(EntityState<UserInfo>),
    RecordsState(EntityState<RunningRecord>),
    GroupsState(EntityState<RunningGroup>),
    AccountState(AccountState),

    /// A write intent for the given screen finished successfully. Sent
    /// from the intent task itself, so it arrives even when the watch
    /// channel coalesces the transient `update_success` snapshot away.
    WriteSettled(ScreenId),

    // ── Member Intents ────────────────────────────────────────────
    LoadMembers(PageQuery),
    LoadMemberOne(EntityId),
    /// Create when the id is unset, update otherwise.
    SaveMember(Box<UserInfo>),
    DeleteMember(EntityId),

    // ── Record Intents ────────────────────────────────────────────
    LoadRecords(PageQuery),
    LoadRecordOne(EntityId),
    SaveRecord(Box<RunningRecord>),
    DeleteRecord(EntityId),

    // ── Group Intents ─────────────────────────────────────────────
    LoadGroups(PageQuery),
    LoadGroupOne(EntityId),
    SaveGroup(Box<RunningGroup>),
    DeleteGroup(EntityId),

    // ── Account Intents ───────────────────────────────────────────
    LoadAccount,
    SaveAccount(Box<Account>),
    /// Clear transient account flags when the settings form closes.
    ResetAccount,

    // ── Confirm Dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Error Banner ──────────────────────────────────────────────
    DismissError,
}
