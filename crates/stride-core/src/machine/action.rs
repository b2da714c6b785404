// ── Actions: CRUD kind × phase, with typed payloads ──

/// CRUD operation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    FetchList,
    FetchOne,
    Create,
    Update,
    Delete,
}

/// Whether a kind reads or writes. Reads drive the `loading` flag,
/// writes drive `updating`; the two never overlap for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    Read,
    Write,
}

impl Kind {
    pub fn class(self) -> KindClass {
        match self {
            Self::FetchList | Self::FetchOne => KindClass::Read,
            Self::Create | Self::Update | Self::Delete => KindClass::Write,
        }
    }

    pub fn is_read(self) -> bool {
        self.class() == KindClass::Read
    }

    pub fn is_write(self) -> bool {
        self.class() == KindClass::Write
    }

    /// Wire-name fragment, e.g. `FETCH_LIST`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::FetchList => "FETCH_LIST",
            Self::FetchOne => "FETCH_ONE",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Payload of a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<E> {
    /// One page of records plus the server-reported total.
    List { entities: Vec<E>, total_items: u64 },
    /// A single record (fetch one, create, update).
    One(E),
    /// Nothing worth keeping came back (delete).
    Deleted,
}

/// Operation phase. Every kind passes through REQUEST and settles as
/// exactly one of SUCCESS or FAILURE.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<E> {
    Request,
    Success(Outcome<E>),
    Failure(String),
}

impl<E> Phase<E> {
    /// Wire-name fragment, e.g. `SUCCESS`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Success(_) => "SUCCESS",
            Self::Failure(_) => "FAILURE",
        }
    }
}

/// One dispatched action: a kind at a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Action<E> {
    pub kind: Kind,
    pub phase: Phase<E>,
}

impl<E> Action<E> {
    pub fn request(kind: Kind) -> Self {
        Self {
            kind,
            phase: Phase::Request,
        }
    }

    pub fn success(kind: Kind, outcome: Outcome<E>) -> Self {
        Self {
            kind,
            phase: Phase::Success(outcome),
        }
    }

    pub fn failure(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            phase: Phase::Failure(message.into()),
        }
    }

    /// Phase-qualified name without the entity prefix, e.g.
    /// `CREATE_SUCCESS`. The store prepends the entity's type tag when
    /// journaling: `userInfo/CREATE_SUCCESS`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.kind.tag(), self.phase.tag())
    }
}
