// ── Account state machine and service ──
//
// The signed-in profile has its own slice: same phase discipline as the
// entity machine but a reduced shape -- no list, no pagination, a single
// record plus a reset action for when the settings form closes.

use std::sync::Arc;

use stride_api::RestClient;

use crate::error::CoreError;
use crate::machine::KindClass;
use crate::model::Account;
use crate::store::slice::AccountSlice;
use crate::store::StateStream;

const ACCOUNT_PATH: &str = "api/account";

/// Operations on the signed-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOp {
    Load,
    Save,
}

impl AccountOp {
    /// Which flag lane the operation drives.
    #[must_use]
    pub fn class(self) -> KindClass {
        match self {
            Self::Load => KindClass::Read,
            Self::Save => KindClass::Write,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Load => "LOAD",
            Self::Save => "SAVE",
        }
    }
}

/// Actions the account slice understands.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountAction {
    Request(AccountOp),
    /// A save returns an empty body, so its payload is `None`; the
    /// follow-up load carries the fresh profile.
    Success(AccountOp, Option<Account>),
    Failure(AccountOp, String),
    /// Clear transient flags without touching the loaded profile.
    Reset,
}

impl AccountAction {
    /// Phase-qualified name, e.g. `SAVE_SUCCESS`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Request(op) => format!("{}_REQUEST", op.tag()),
            Self::Success(op, _) => format!("{}_SUCCESS", op.tag()),
            Self::Failure(op, _) => format!("{}_FAILURE", op.tag()),
            Self::Reset => "RESET".into(),
        }
    }
}

/// State behind the settings form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    pub account: Option<Account>,
    pub loading: bool,
    pub updating: bool,
    pub update_success: bool,
    pub error_message: Option<String>,
}

/// Pure transition function for the account slice.
#[must_use]
pub fn reduce_account(state: AccountState, action: AccountAction) -> AccountState {
    let mut next = state;
    match action {
        AccountAction::Request(op) => {
            next.error_message = None;
            next.update_success = false;
            match op.class() {
                KindClass::Read => next.loading = true,
                KindClass::Write => next.updating = true,
            }
        }
        AccountAction::Success(op, payload) => {
            match op.class() {
                KindClass::Read => next.loading = false,
                KindClass::Write => {
                    next.updating = false;
                    next.update_success = true;
                }
            }
            if let Some(account) = payload {
                next.account = Some(account);
            }
        }
        AccountAction::Failure(op, message) => {
            match op.class() {
                KindClass::Read => next.loading = false,
                KindClass::Write => next.updating = false,
            }
            next.update_success = false;
            next.error_message = Some(message);
        }
        AccountAction::Reset => {
            next.update_success = false;
            next.error_message = None;
        }
    }
    next
}

// ── Service ──────────────────────────────────────────────────────────

/// Operations on `/api/account`, bound to the account slice.
pub struct AccountService {
    rest: Arc<RestClient>,
    slice: Arc<AccountSlice>,
}

impl AccountService {
    pub(crate) fn new(rest: Arc<RestClient>, slice: Arc<AccountSlice>) -> Self {
        Self { rest, slice }
    }

    /// Fetch the signed-in profile into the slice.
    pub async fn load(&self) -> Result<(), CoreError> {
        let token = self.slice.begin(AccountOp::Load);
        match self.rest.get::<Account>(ACCOUNT_PATH).await {
            Ok(account) => {
                self.slice
                    .settle(token, AccountAction::Success(AccountOp::Load, Some(account)));
                Ok(())
            }
            Err(err) => {
                let core = CoreError::from(err);
                self.slice
                    .settle(token, AccountAction::Failure(AccountOp::Load, core.to_string()));
                Err(core)
            }
        }
    }

    /// Save profile edits, then reload so the slice reflects what the
    /// server actually stored.
    pub async fn save(&self, account: &Account) -> Result<(), CoreError> {
        let token = self.slice.begin(AccountOp::Save);
        match self.rest.post_empty(ACCOUNT_PATH, account).await {
            Ok(()) => {
                self.slice
                    .settle(token, AccountAction::Success(AccountOp::Save, None));
                self.load().await
            }
            Err(err) => {
                let core = CoreError::from(err);
                self.slice
                    .settle(token, AccountAction::Failure(AccountOp::Save, core.to_string()));
                Err(core)
            }
        }
    }

    /// Clear transient flags (form closed or navigated away).
    pub fn reset(&self) {
        self.slice.apply(AccountAction::Reset);
    }

    /// Current slice state.
    #[must_use]
    pub fn state(&self) -> AccountState {
        self.slice.snapshot()
    }

    /// Subscribe to slice changes.
    #[must_use]
    pub fn subscribe(&self) -> StateStream<AccountState> {
        StateStream::new(self.slice.subscribe())
    }
}
