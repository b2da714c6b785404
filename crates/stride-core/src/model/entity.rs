// ── Entity identity and the CRUD contract ──

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Server-assigned record identifier.
pub type EntityId = i64;

/// Contract every CRUD-managed entity type fulfills.
///
/// The two constants are the per-type configuration of the generic state
/// machine: `RESOURCE` names the REST collection under `/api/`, and
/// `TYPE_TAG` prefixes the phase-qualified action names that show up in
/// the dispatch journal and logs (e.g. `userInfo/CREATE_SUCCESS`).
pub trait Entity:
    Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// REST collection segment, e.g. `user-infos`.
    const RESOURCE: &'static str;

    /// Action-name prefix, e.g. `userInfo`.
    const TYPE_TAG: &'static str;

    /// The record's id, if the server has assigned one yet.
    fn id(&self) -> Option<EntityId>;
}
