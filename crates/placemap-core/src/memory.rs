//! In-process stores used when no database is attached (tests, dry runs).

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::places::{NewPlace, Place, PlaceChanges, PlaceStore};
use crate::properties::{NewProperty, PropertyRecord, PropertyStore};

#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    records: Mutex<Vec<PropertyRecord>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PropertyStore for MemoryPropertyStore {
    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut records = self.records.lock().await;
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }

    async fn insert(&self, property: NewProperty) -> Result<PropertyRecord, RepositoryError> {
        let record = PropertyRecord::from_new(Uuid::new_v4(), property, Utc::now());
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let mut records = self.records.lock().await.clone();
        records.reverse();
        Ok(records)
    }
}

#[derive(Debug, Default)]
pub struct MemoryPlaceStore {
    places: Mutex<Vec<Place>>,
}

impl MemoryPlaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaceStore for MemoryPlaceStore {
    async fn list(&self) -> Result<Vec<Place>, RepositoryError> {
        let mut places = self.places.lock().await.clone();
        places.reverse();
        Ok(places)
    }

    async fn get(&self, id: Uuid) -> Result<Place, RepositoryError> {
        self.places
            .lock()
            .await
            .iter()
            .find(|place| place.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError> {
        let place = Place::from_new(Uuid::new_v4(), place, Utc::now());
        self.places.lock().await.push(place.clone());
        Ok(place)
    }

    async fn update(&self, id: Uuid, changes: PlaceChanges) -> Result<Place, RepositoryError> {
        let mut places = self.places.lock().await;
        let place = places
            .iter_mut()
            .find(|place| place.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        changes.apply(place, Utc::now());
        Ok(place.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut places = self.places.lock().await;
        let before = places.len();
        places.retain(|place| place.id != id);
        if places.len() == before {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
