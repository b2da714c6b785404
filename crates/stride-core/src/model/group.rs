// ── Running group domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// A training group within the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningGroup {
    pub id: Option<EntityId>,
    pub name: String,
    pub leader_id: Option<EntityId>,
    /// Maintained by the server; read-only from this side.
    pub member_count: Option<u32>,
    pub created_date: Option<DateTime<Utc>>,
}

impl Entity for RunningGroup {
    const RESOURCE: &'static str = "running-groups";
    const TYPE_TAG: &'static str = "runningGroup";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}
