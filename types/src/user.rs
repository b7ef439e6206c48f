use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The account of the signed in user, as returned by `UserInfo`.
///
/// The password is never sent back by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// UUID of the user.
    pub id: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}
