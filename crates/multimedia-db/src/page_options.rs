//! Page option repository
//!
//! Page options are keyed by name; an attached wallpaper asset is stored as an
//! embedded JSON document.

use crate::error::{PersistError, PersistResult};
use crate::store::{MetadataStore, Record, RecordKey};
use async_trait::async_trait;
use multimedia_core::{MultimediaAsset, PageOption};
use std::sync::Arc;

const NAME: &str = "name";
const TERMS: &str = "terms";
const WALLPAPER: &str = "wallpaper";

#[async_trait]
pub trait PageOptionRepository: Send + Sync {
    async fn store(&self, option: &PageOption) -> PersistResult<()>;

    async fn find_by_name(&self, name: &str) -> PersistResult<Option<PageOption>>;
}

#[derive(Clone)]
pub struct MetadataPageOptionRepository {
    store: Arc<dyn MetadataStore>,
    table: String,
}

impl MetadataPageOptionRepository {
    pub fn new(store: Arc<dyn MetadataStore>, table: impl Into<String>) -> PersistResult<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(PersistError::Config(
                "page options table name must not be empty".to_string(),
            ));
        }
        Ok(Self { store, table })
    }
}

fn option_to_record(option: &PageOption) -> PersistResult<Record> {
    let mut record = Record::new();
    record.insert(NAME.to_string(), option.name.clone());
    record.insert(TERMS.to_string(), option.terms.clone());
    if let Some(wallpaper) = &option.wallpaper {
        let json = serde_json::to_string(wallpaper)
            .map_err(|e| PersistError::Store(format!("failed to encode wallpaper: {}", e)))?;
        record.insert(WALLPAPER.to_string(), json);
    }
    Ok(record)
}

fn record_to_option(record: &Record) -> PersistResult<PageOption> {
    let name = record
        .get(NAME)
        .cloned()
        .ok_or_else(|| PersistError::Decode("missing attribute 'name'".to_string()))?;
    let wallpaper = record
        .get(WALLPAPER)
        .map(|json| serde_json::from_str::<MultimediaAsset>(json))
        .transpose()
        .map_err(|e| PersistError::Decode(format!("invalid wallpaper: {}", e)))?;

    Ok(PageOption {
        name,
        terms: record.get(TERMS).cloned().unwrap_or_default(),
        wallpaper,
    })
}

#[async_trait]
impl PageOptionRepository for MetadataPageOptionRepository {
    #[tracing::instrument(skip(self, option), fields(db.table = %self.table, db.operation = "upsert", name = %option.name))]
    async fn store(&self, option: &PageOption) -> PersistResult<()> {
        let record = option_to_record(option)?;
        self.store
            .put_record(&self.table, &RecordKey::new(NAME, option.name.clone()), record)
            .await
    }

    #[tracing::instrument(skip(self), fields(db.table = %self.table, db.operation = "select"))]
    async fn find_by_name(&self, name: &str) -> PersistResult<Option<PageOption>> {
        let record = self
            .store
            .get_record(&self.table, &RecordKey::new(NAME, name))
            .await?;
        record.as_ref().map(record_to_option).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMetadataStore;
    use multimedia_core::AssetType;
    use uuid::Uuid;

    fn repo(store: &InMemoryMetadataStore) -> MetadataPageOptionRepository {
        MetadataPageOptionRepository::new(Arc::new(store.clone()), "page_options").unwrap()
    }

    #[tokio::test]
    async fn test_store_and_find_with_wallpaper() {
        let store = InMemoryMetadataStore::new();
        let repo = repo(&store);

        let mut wallpaper = MultimediaAsset::new(
            "https://media.s3.amazonaws.com",
            "bg.jpg",
            AssetType::Image,
        )
        .unwrap();
        wallpaper.assign_id(Uuid::new_v4()).unwrap();

        let option = PageOption {
            name: "home".to_string(),
            terms: "Be kind".to_string(),
            wallpaper: Some(wallpaper),
        };
        repo.store(&option).await.unwrap();

        assert_eq!(repo.find_by_name("home").await.unwrap(), Some(option));
    }

    #[tokio::test]
    async fn test_store_overwrites_and_clears_wallpaper() {
        let store = InMemoryMetadataStore::new();
        let repo = repo(&store);

        let option = PageOption {
            name: "about".to_string(),
            terms: "v1".to_string(),
            wallpaper: None,
        };
        repo.store(&option).await.unwrap();
        let updated = PageOption {
            terms: "v2".to_string(),
            ..option
        };
        repo.store(&updated).await.unwrap();

        let found = repo.find_by_name("about").await.unwrap().unwrap();
        assert_eq!(found.terms, "v2");
        assert_eq!(found.wallpaper, None);
    }

    #[tokio::test]
    async fn test_find_missing_name() {
        let store = InMemoryMetadataStore::new();
        assert_eq!(repo(&store).find_by_name("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_wallpaper_is_decode_error() {
        let store = InMemoryMetadataStore::new();
        let mut record = Record::new();
        record.insert(NAME.to_string(), "home".to_string());
        record.insert(WALLPAPER.to_string(), "{not json".to_string());
        store.insert_raw("page_options", "home", record);

        assert!(matches!(
            repo(&store).find_by_name("home").await,
            Err(PersistError::Decode(_))
        ));
    }
}
