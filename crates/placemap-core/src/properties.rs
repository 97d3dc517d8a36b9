//! Storage for properties imported from the spreadsheet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::csv_import::ImportRow;
use crate::db::DbPool;
use crate::error::RepositoryError;
use crate::geocoding::GeocodeResult;

/// A geocoded row ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub row: ImportRow,
    pub location: GeocodeResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: Uuid,
    pub street: String,
    pub neighborhood: String,
    pub municipality: String,
    pub price: Option<String>,
    pub area: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub parking: Option<String>,
    pub amenities: Option<String>,
    pub description: Option<String>,
    pub listing_url: Option<String>,
    pub maintenance_fee: Option<String>,
    pub agency: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub full_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyRecord {
    pub fn from_new(id: Uuid, new: NewProperty, now: DateTime<Utc>) -> Self {
        let NewProperty { row, location } = new;
        Self {
            id,
            street: row.street,
            neighborhood: row.neighborhood,
            municipality: row.municipality,
            price: row.price,
            area: row.area,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            parking: row.parking,
            amenities: row.amenities,
            description: row.description,
            listing_url: row.listing_url,
            maintenance_fee: row.maintenance_fee,
            agency: row.agency,
            latitude: location.latitude,
            longitude: location.longitude,
            full_address: location.formatted_address,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The importer only creates and bulk-deletes; records are never updated.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
    async fn insert(&self, property: NewProperty) -> Result<PropertyRecord, RepositoryError>;
    async fn list(&self) -> Result<Vec<PropertyRecord>, RepositoryError>;
}

#[derive(Clone)]
pub struct PgPropertyStore {
    pool: DbPool,
}

impl PgPropertyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM properties")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, property: NewProperty) -> Result<PropertyRecord, RepositoryError> {
        let record = PropertyRecord::from_new(Uuid::new_v4(), property, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO properties (
                id,
                street,
                neighborhood,
                municipality,
                price,
                area,
                bedrooms,
                bathrooms,
                parking,
                amenities,
                description,
                listing_url,
                maintenance_fee,
                agency,
                latitude,
                longitude,
                full_address,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(record.id)
        .bind(&record.street)
        .bind(&record.neighborhood)
        .bind(&record.municipality)
        .bind(&record.price)
        .bind(&record.area)
        .bind(&record.bedrooms)
        .bind(&record.bathrooms)
        .bind(&record.parking)
        .bind(&record.amenities)
        .bind(&record.description)
        .bind(&record.listing_url)
        .bind(&record.maintenance_fee)
        .bind(&record.agency)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.full_address)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, PropertyRecord>(
            r#"
            SELECT
                id, street, neighborhood, municipality, price, area, bedrooms,
                bathrooms, parking, amenities, description, listing_url,
                maintenance_fee, agency, latitude, longitude, full_address,
                created_at, updated_at
            FROM properties
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
