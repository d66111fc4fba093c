use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{NewUniversity, University, UserAccount};
use crate::database::store::{StoreError, UniversityStore, UserStore};
use crate::filter::filter_order::FilterOrder;
use crate::filter::types::UniversityQuery;

/// In-process document store. Natural order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    universities: RwLock<Vec<University>>,
    users: RwLock<Vec<UserAccount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UniversityStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<University>, StoreError> {
        let universities = self.universities.read().await;
        Ok(universities.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<University>, StoreError> {
        let universities = self.universities.read().await;
        Ok(universities.iter().find(|u| same_name(&u.name, name)).cloned())
    }

    async fn count(&self, query: &UniversityQuery) -> Result<u64, StoreError> {
        let universities = self.universities.read().await;
        Ok(universities.iter().filter(|u| query.matches(u)).count() as u64)
    }

    async fn find_page(
        &self,
        query: &UniversityQuery,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<University>, StoreError> {
        let universities = self.universities.read().await;
        let mut matching: Vec<&University> = universities.iter().filter(|u| query.matches(u)).collect();
        // Stable, so ties keep insertion order
        matching.sort_by(|a, b| FilterOrder::compare(&query.order, a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn insert(&self, draft: NewUniversity) -> Result<University, StoreError> {
        let mut universities = self.universities.write().await;
        if universities.iter().any(|u| same_name(&u.name, &draft.name)) {
            return Err(StoreError::Duplicate(format!("name '{}'", draft.name)));
        }

        let now = Utc::now();
        let record = University {
            id: Uuid::new_v4(),
            name: draft.name,
            country: draft.country,
            webpages: draft.webpages,
            is_bookmark: draft.is_bookmark,
            is_active: draft.is_active,
            deleted_at: None,
            created_at: now,
            last_modified_at: now,
        };
        universities.push(record.clone());
        Ok(record)
    }

    async fn save(&self, mut record: University) -> Result<University, StoreError> {
        let mut universities = self.universities.write().await;
        let index = universities
            .iter()
            .position(|u| u.id == record.id)
            .ok_or(StoreError::NotFound(record.id))?;

        if universities
            .iter()
            .any(|u| u.id != record.id && same_name(&u.name, &record.name))
        {
            return Err(StoreError::Duplicate(format!("name '{}'", record.name)));
        }

        let slot = &mut universities[index];
        record.created_at = slot.created_at;
        record.last_modified_at = Utc::now();
        *slot = record.clone();
        Ok(record)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserAccount, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate(format!("username '{}'", username)));
        }
        let account = UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(account.clone());
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::{FilterOrderInfo, Predicate, SortColumn, SortDirection};

    fn draft(name: &str, country: &str) -> NewUniversity {
        NewUniversity {
            name: name.to_string(),
            country: country.to_string(),
            webpages: vec![],
            is_bookmark: false,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_timestamps() {
        let store = MemoryStore::new();
        let record = store.insert(draft("mit", "USA")).await.unwrap();
        assert_eq!(record.created_at, record.last_modified_at);
        assert_eq!(store.find_by_id(record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn rejects_duplicate_names_case_insensitively() {
        let store = MemoryStore::new();
        store.insert(draft("mit", "USA")).await.unwrap();
        let err = store.insert(draft("MIT", "USA")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert!(store.find_by_name("Mit").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_replaces_document_and_keeps_created_at() {
        let store = MemoryStore::new();
        let original = store.insert(draft("mit", "USA")).await.unwrap();

        let mut changed = original.clone();
        changed.country = "United States".to_string();
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        let saved = store.save(changed).await.unwrap();

        assert_eq!(saved.country, "United States");
        assert_eq!(saved.created_at, original.created_at);
        assert!(saved.last_modified_at >= original.last_modified_at);
    }

    #[tokio::test]
    async fn save_of_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let mut ghost = store.insert(draft("mit", "USA")).await.unwrap();
        ghost.id = Uuid::new_v4();
        assert!(matches!(store.save(ghost).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn save_rejects_name_taken_by_another_record() {
        let store = MemoryStore::new();
        store.insert(draft("mit", "USA")).await.unwrap();
        let mut other = store.insert(draft("caltech", "USA")).await.unwrap();
        other.name = "MIT".to_string();
        assert!(matches!(store.save(other).await, Err(StoreError::Duplicate(_))));
    }

    #[tokio::test]
    async fn pages_filtered_and_sorted() {
        let store = MemoryStore::new();
        for i in 0..6 {
            let mut d = draft(&format!("uni-{}", i), if i % 2 == 0 { "Canada" } else { "USA" });
            d.is_bookmark = i == 4;
            store.insert(d).await.unwrap();
        }

        let query = UniversityQuery {
            predicates: vec![Predicate::CountryContains("can".to_string())],
            order: vec![FilterOrderInfo { column: SortColumn::IsBookmark, sort: SortDirection::Desc }],
        };
        assert_eq!(store.count(&query).await.unwrap(), 3);

        let first = store.find_page(&query, 0, 2).await.unwrap();
        let names: Vec<&str> = first.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["uni-4", "uni-0"]);

        let second = store.find_page(&query, 2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "uni-2");
    }

    #[tokio::test]
    async fn users_are_unique_by_username() {
        let store = MemoryStore::new();
        store.insert_user("alice", "hash").await.unwrap();
        assert!(matches!(
            store.insert_user("alice", "other").await,
            Err(StoreError::Duplicate(_))
        ));
        assert!(store.find_by_username("alice").await.unwrap().is_some());
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }
}
