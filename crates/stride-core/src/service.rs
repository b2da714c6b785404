// ── Entity services ──
//
// One service per entity type binds the REST client to that type's
// slice. Every operation dispatches its REQUEST before touching the
// wire and settles with SUCCESS or FAILURE afterwards; writes then
// chain a list refresh with the last-used query so list views stay on
// their page.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use stride_api::{Page, PageQuery, RestClient};

use crate::error::CoreError;
use crate::machine::{Action, EntityState, Kind, Outcome};
use crate::model::{Entity, EntityId};
use crate::store::StateStream;
use crate::store::slice::Slice;

/// CRUD operations for one entity type, bound to its slice.
pub struct EntityService<E: Entity> {
    rest: Arc<RestClient>,
    slice: Arc<Slice<E>>,
    /// Query of the most recent list fetch. Write refreshes reuse it.
    last_query: Mutex<PageQuery>,
}

impl<E: Entity> EntityService<E> {
    pub(crate) fn new(rest: Arc<RestClient>, slice: Arc<Slice<E>>, query: PageQuery) -> Self {
        Self {
            rest,
            slice,
            last_query: Mutex::new(query),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Load one page of records into the slice and remember the query.
    pub async fn fetch_list(&self, query: &PageQuery) -> Result<(), CoreError> {
        *self.last_query.lock().await = query.clone();
        self.fetch_list_inner(query).await
    }

    async fn fetch_list_inner(&self, query: &PageQuery) -> Result<(), CoreError> {
        let token = self.slice.begin(Kind::FetchList);
        match self.rest.get_list::<E>(E::RESOURCE, query).await {
            Ok(Page { items, total_items }) => {
                self.slice.settle(
                    token,
                    Action::success(
                        Kind::FetchList,
                        Outcome::List {
                            entities: items,
                            total_items,
                        },
                    ),
                );
                Ok(())
            }
            Err(err) => {
                let core = CoreError::from(err);
                self.slice
                    .settle(token, Action::failure(Kind::FetchList, core.to_string()));
                Err(core)
            }
        }
    }

    /// Load a single record into the slice's detail slot.
    pub async fn fetch_one(&self, id: EntityId) -> Result<(), CoreError> {
        let token = self.slice.begin(Kind::FetchOne);
        match self.rest.get_one::<E>(E::RESOURCE, id).await {
            Ok(record) => {
                self.slice
                    .settle(token, Action::success(Kind::FetchOne, Outcome::One(record)));
                Ok(())
            }
            Err(err) => {
                let core = CoreError::from(err);
                self.slice
                    .settle(token, Action::failure(Kind::FetchOne, core.to_string()));
                Err(core)
            }
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create a record, then refresh the list.
    pub async fn create(&self, record: E) -> Result<(), CoreError> {
        self.write_then_refresh(Kind::Create, async {
            self.rest
                .create::<E, E>(E::RESOURCE, &record)
                .await
                .map(Outcome::One)
        })
        .await
    }

    /// Replace a record by its id, then refresh the list.
    pub async fn update(&self, record: E) -> Result<(), CoreError> {
        // Client-side check: an id-less update never reaches the wire,
        // so no REQUEST is dispatched either.
        let Some(id) = record.id() else {
            return Err(CoreError::ValidationFailed {
                message: "cannot update a record without an id".into(),
            });
        };

        self.write_then_refresh(Kind::Update, async {
            self.rest
                .update::<E, E>(E::RESOURCE, id, &record)
                .await
                .map(Outcome::One)
        })
        .await
    }

    /// Delete a record, then refresh the list.
    pub async fn remove(&self, id: EntityId) -> Result<(), CoreError> {
        self.write_then_refresh(Kind::Delete, async {
            self.rest
                .remove(E::RESOURCE, id)
                .await
                .map(|()| Outcome::Deleted)
        })
        .await
    }

    /// Run a write and, on success, chain the list refresh. Observers of
    /// the journal see the write's REQUEST/SUCCESS pair followed by the
    /// refresh's, in that order. A refresh failure fails the call; the
    /// write itself already settled.
    async fn write_then_refresh<Fut>(&self, kind: Kind, op: Fut) -> Result<(), CoreError>
    where
        Fut: Future<Output = Result<Outcome<E>, stride_api::Error>>,
    {
        let token = self.slice.begin(kind);
        match op.await {
            Ok(outcome) => {
                self.slice.settle(token, Action::success(kind, outcome));
                let query = self.last_query.lock().await.clone();
                self.fetch_list_inner(&query).await
            }
            Err(err) => {
                let core = CoreError::from(err);
                self.slice
                    .settle(token, Action::failure(kind, core.to_string()));
                Err(core)
            }
        }
    }

    // ── State access ─────────────────────────────────────────────────

    /// Current slice state (cheap clone of the watched value).
    #[must_use]
    pub fn state(&self) -> EntityState<E> {
        self.slice.snapshot()
    }

    /// Subscribe to slice changes.
    #[must_use]
    pub fn subscribe(&self) -> StateStream<EntityState<E>> {
        StateStream::new(self.slice.subscribe())
    }
}
