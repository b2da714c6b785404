// ── Console facade ──
//
// Composition root for one server connection. Builds the REST client,
// the store, and one service per entity type from a `ClientConfig`;
// the CLI uses it for one-shot commands, the TUI keeps it for the
// whole session.

use std::sync::Arc;

use tracing::info;

use stride_api::{PageQuery, RestClient};

use crate::account::AccountService;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{RunningGroup, RunningRecord, UserInfo};
use crate::service::EntityService;
use crate::store::AdminStore;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Stateless on the wire:
/// every operation is an independent authenticated request, so there is
/// no connect/disconnect lifecycle to manage.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ClientConfig,
    store: Arc<AdminStore>,
    members: EntityService<UserInfo>,
    records: EntityService<RunningRecord>,
    groups: EntityService<RunningGroup>,
    account: AccountService,
}

impl Console {
    /// Build a console from configuration. Fails only on unusable
    /// configuration (bad URL, unreadable CA file); the first request
    /// is what actually exercises the connection.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let rest = Arc::new(RestClient::new(
            config.url.as_str(),
            config.token.as_ref(),
            &config.transport(),
        )?);
        let store = Arc::new(AdminStore::new());
        let query = config.default_query();

        let inner = ConsoleInner {
            members: EntityService::new(rest.clone(), store.members.clone(), query.clone()),
            records: EntityService::new(rest.clone(), store.records.clone(), query.clone()),
            groups: EntityService::new(rest.clone(), store.groups.clone(), query),
            account: AccountService::new(rest, store.account.clone()),
            store,
            config,
        };

        info!(url = %inner.config.url, "console ready");
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Access the connection configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<AdminStore> {
        &self.inner.store
    }

    /// First page with the configured size.
    #[must_use]
    pub fn default_query(&self) -> PageQuery {
        self.inner.config.default_query()
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn members(&self) -> &EntityService<UserInfo> {
        &self.inner.members
    }

    pub fn records(&self) -> &EntityService<RunningRecord> {
        &self.inner.records
    }

    pub fn groups(&self) -> &EntityService<RunningGroup> {
        &self.inner.groups
    }

    pub fn account(&self) -> &AccountService {
        &self.inner.account
    }
}
