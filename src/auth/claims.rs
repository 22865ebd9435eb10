use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload. There is no `exp`: tokens stay valid until the secret changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid, // user ID
    pub email: String,
}
