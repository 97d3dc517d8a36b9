use std::sync::Arc;

use anyhow::{Context, Result};
use placemap_core::chat::ChatClient;
use placemap_core::config::AppConfig;
use placemap_core::db::{self, DbPool};
use placemap_core::geocoding::GoogleGeocoder;
use placemap_core::import::SheetImporter;
use placemap_core::places::{PgPlaceStore, PlaceStore};
use placemap_core::properties::{PgPropertyStore, PropertyStore};
use placemap_core::sheet::HttpSheetFetcher;
use placemap_core::throttle::Throttle;
use tokio::sync::Mutex;

pub struct AppState {
    pub places: Arc<dyn PlaceStore>,
    pub properties: Arc<dyn PropertyStore>,
    /// Held for the whole run so two import requests never interleave their
    /// delete-then-insert sequences.
    pub importer: Mutex<SheetImporter>,
    pub chat: ChatClient,
}

impl AppState {
    pub fn new(
        places: Arc<dyn PlaceStore>,
        properties: Arc<dyn PropertyStore>,
        importer: SheetImporter,
        chat: ChatClient,
    ) -> Arc<Self> {
        Arc::new(Self {
            places,
            properties,
            importer: Mutex::new(importer),
            chat,
        })
    }

    /// Connects to Postgres, applies migrations and wires the production
    /// components.
    pub async fn from_config(config: &AppConfig) -> Result<Arc<Self>> {
        let pool = connect_pool(config).await?;
        db::run_migrations(&pool).await?;

        let properties: Arc<dyn PropertyStore> = Arc::new(PgPropertyStore::new(pool.clone()));
        let places: Arc<dyn PlaceStore> = Arc::new(PgPlaceStore::new(pool));
        let importer = build_importer(config, properties.clone())?;
        let chat = ChatClient::new(config.chat.clone())?;

        Ok(Self::new(places, properties, importer, chat))
    }
}

pub async fn connect_pool(config: &AppConfig) -> Result<DbPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;
    db::connect(database_url).await
}

pub fn build_importer(config: &AppConfig, store: Arc<dyn PropertyStore>) -> Result<SheetImporter> {
    Ok(SheetImporter::new(
        config.sheet.clone(),
        Arc::new(HttpSheetFetcher::new()?),
        Arc::new(GoogleGeocoder::new(config.geocoding.clone())?),
        store,
        Throttle::new(config.throttle),
    ))
}
