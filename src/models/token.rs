use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::Serialize;

/// Length in bytes of the random part of a key; hex-encoded it is 40 chars.
const KEY_BYTES: usize = 20;

/// Stored API credential, one row per issued key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ApiToken {
    pub key: String,
    pub username: String,
    pub is_active: bool,
    pub created: DateTime<Utc>,
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUser {
    pub username: String,
}

impl ApiToken {
    /// Fresh random key from the OS-seeded thread RNG.
    pub fn generate_key() -> String {
        let mut bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn user(&self) -> ApiUser {
        ApiUser {
            username: self.username.clone(),
        }
    }
}
