use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated back-office user, taken from the access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
