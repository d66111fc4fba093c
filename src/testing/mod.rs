use std::sync::Arc;

use serde_json::json;

use crate::auth::JwtKeys;
use crate::database::models::University;
use crate::database::MemoryStore;
use crate::services::{UniversityService, UserService};

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Memory-backed services sharing one store, for unit tests
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub universities: UniversityService,
    pub users: UserService,
    pub jwt: JwtKeys,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let jwt = JwtKeys::new(TEST_JWT_SECRET, 1).expect("test secret is non-empty");
        Self {
            universities: UniversityService::new(store.clone()),
            users: UserService::new(store.clone(), jwt.clone()),
            store,
            jwt,
        }
    }

    /// Creates an active, non-bookmarked university through the service
    pub async fn seed(&self, name: &str, country: &str) -> University {
        let payload = json!({ "name": name, "country": country });
        self.universities
            .create(payload.as_object().cloned().unwrap_or_default())
            .await
            .expect("seed university")
    }
}
