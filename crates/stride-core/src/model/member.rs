// ── Member domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// Membership status. Frozen members keep their history but cannot log
/// new runs until reactivated.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserStatus {
    #[default]
    Active,
    Frozen,
}

impl UserStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A club member record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Option<EntityId>,
    pub login: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    pub group_id: Option<EntityId>,
    pub joined_date: Option<DateTime<Utc>>,
}

impl UserInfo {
    /// Nickname if set, login otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.login)
    }
}

impl Entity for UserInfo {
    const RESOURCE: &'static str = "user-infos";
    const TYPE_TAG: &'static str = "userInfo";

    fn id(&self) -> Option<EntityId> {
        self.id
    }
}
