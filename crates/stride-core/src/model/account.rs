// ── Signed-in account ──
//
// The administrator's own profile. Not a CRUD entity: it has no id-based
// collection, just `GET /api/account` and `POST /api/account`.

use serde::{Deserialize, Serialize};

/// The signed-in administrator's profile, as the server reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// BCP 47 language tag for server-rendered mail, e.g. `en` or `zh-cn`.
    pub lang_key: Option<String>,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl Account {
    /// Full name when set, login otherwise.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(one), None) | (None, Some(one)) => one.to_owned(),
            (None, None) => self.login.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.authorities.iter().any(|a| a == "ROLE_ADMIN")
    }
}
