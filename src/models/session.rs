//! Session token stored under the auth key while a panel user is logged in.

use serde::{Deserialize, Serialize};

/// Opaque session record persisted on successful login. Its presence (and
/// nothing else) is what gates the editor session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub username: String,
    pub role: String,
}

impl SessionToken {
    pub fn is_owner(&self) -> bool {
        self.role == "owner"
    }
}
