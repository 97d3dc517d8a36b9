//! Manually curated places shown on the map.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceCategory {
    Restaurante,
    #[serde(rename = "Café")]
    Cafe,
    Parque,
    Museo,
    Tienda,
    Hotel,
    Entretenimiento,
    Salud,
    #[serde(rename = "Educación")]
    Educacion,
    Servicios,
    Otro,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 11] = [
        PlaceCategory::Restaurante,
        PlaceCategory::Cafe,
        PlaceCategory::Parque,
        PlaceCategory::Museo,
        PlaceCategory::Tienda,
        PlaceCategory::Hotel,
        PlaceCategory::Entretenimiento,
        PlaceCategory::Salud,
        PlaceCategory::Educacion,
        PlaceCategory::Servicios,
        PlaceCategory::Otro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurante => "Restaurante",
            PlaceCategory::Cafe => "Café",
            PlaceCategory::Parque => "Parque",
            PlaceCategory::Museo => "Museo",
            PlaceCategory::Tienda => "Tienda",
            PlaceCategory::Hotel => "Hotel",
            PlaceCategory::Entretenimiento => "Entretenimiento",
            PlaceCategory::Salud => "Salud",
            PlaceCategory::Educacion => "Educación",
            PlaceCategory::Servicios => "Servicios",
            PlaceCategory::Otro => "Otro",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceCategory {
    type Err = PlaceValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        PlaceCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| PlaceValidationError::UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: PlaceCategory,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum PlaceValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("{field} {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Request body for creating a place. Everything is optional at the wire
/// level so missing fields can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: PlaceCategory,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_latitude(value: f64) -> Result<f64, PlaceValidationError> {
    if (-90.0..=90.0).contains(&value) {
        Ok(value)
    } else {
        Err(PlaceValidationError::OutOfRange {
            field: "latitude",
            value,
        })
    }
}

fn check_longitude(value: f64) -> Result<f64, PlaceValidationError> {
    if (-180.0..=180.0).contains(&value) {
        Ok(value)
    } else {
        Err(PlaceValidationError::OutOfRange {
            field: "longitude",
            value,
        })
    }
}

impl PlaceInput {
    pub fn validate(self) -> Result<NewPlace, PlaceValidationError> {
        let name = non_blank(self.name);
        let description = non_blank(self.description);
        let category = non_blank(self.category);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if description.is_none() {
            missing.push("description");
        }
        if self.latitude.is_none() {
            missing.push("latitude");
        }
        if self.longitude.is_none() {
            missing.push("longitude");
        }
        if category.is_none() {
            missing.push("category");
        }

        match (name, description, self.latitude, self.longitude, category) {
            (Some(name), Some(description), Some(latitude), Some(longitude), Some(category)) => {
                Ok(NewPlace {
                    name,
                    description,
                    latitude: check_latitude(latitude)?,
                    longitude: check_longitude(longitude)?,
                    category: category.parse::<PlaceCategory>()?,
                    image_url: self.image_url,
                    rating: self.rating,
                    address: self.address,
                    website: self.website,
                    phone_number: self.phone_number,
                })
            }
            _ => Err(PlaceValidationError::MissingFields(missing)),
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<PlaceCategory>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

impl PlacePatch {
    pub fn validate(self) -> Result<PlaceChanges, PlaceValidationError> {
        let mut blank = Vec::new();
        if self.name.as_ref().is_some_and(|v| v.trim().is_empty()) {
            blank.push("name");
        }
        if self.description.as_ref().is_some_and(|v| v.trim().is_empty()) {
            blank.push("description");
        }
        if !blank.is_empty() {
            return Err(PlaceValidationError::MissingFields(blank));
        }

        Ok(PlaceChanges {
            name: self.name,
            description: self.description,
            latitude: self.latitude.map(check_latitude).transpose()?,
            longitude: self.longitude.map(check_longitude).transpose()?,
            category: self.category.as_deref().map(str::parse::<PlaceCategory>).transpose()?,
            image_url: self.image_url,
            rating: self.rating,
            address: self.address,
            website: self.website,
            phone_number: self.phone_number,
        })
    }
}

impl PlaceChanges {
    pub fn apply(self, place: &mut Place, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            place.name = name;
        }
        if let Some(description) = self.description {
            place.description = description;
        }
        if let Some(latitude) = self.latitude {
            place.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            place.longitude = longitude;
        }
        if let Some(category) = self.category {
            place.category = category;
        }
        if self.image_url.is_some() {
            place.image_url = self.image_url;
        }
        if self.rating.is_some() {
            place.rating = self.rating;
        }
        if self.address.is_some() {
            place.address = self.address;
        }
        if self.website.is_some() {
            place.website = self.website;
        }
        if self.phone_number.is_some() {
            place.phone_number = self.phone_number;
        }
        place.updated_at = now;
    }
}

impl Place {
    pub fn from_new(id: Uuid, new: NewPlace, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            latitude: new.latitude,
            longitude: new.longitude,
            category: new.category,
            image_url: new.image_url,
            rating: new.rating,
            address: new.address,
            website: new.website,
            phone_number: new.phone_number,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<Place>, RepositoryError>;
    async fn get(&self, id: Uuid) -> Result<Place, RepositoryError>;
    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError>;
    async fn update(&self, id: Uuid, changes: PlaceChanges) -> Result<Place, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

#[derive(Debug, FromRow)]
struct PlaceRow {
    id: Uuid,
    name: String,
    description: String,
    latitude: f64,
    longitude: f64,
    category: String,
    image_url: Option<String>,
    rating: Option<f64>,
    address: Option<String>,
    website: Option<String>,
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlaceRow> for Place {
    type Error = RepositoryError;

    fn try_from(row: PlaceRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|_| RepositoryError::InvalidCategory(row.category.clone()))?;
        Ok(Place {
            id: row.id,
            name: row.name,
            description: row.description,
            latitude: row.latitude,
            longitude: row.longitude,
            category,
            image_url: row.image_url,
            rating: row.rating,
            address: row.address,
            website: row.website,
            phone_number: row.phone_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PLACE_COLUMNS: &str = "id, name, description, latitude, longitude, category, image_url, rating, address, website, phone_number, created_at, updated_at";

#[derive(Clone)]
pub struct PgPlaceStore {
    pool: DbPool,
}

impl PgPlaceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceStore for PgPlaceStore {
    async fn list(&self) -> Result<Vec<Place>, RepositoryError> {
        let rows = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Place::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Place, RepositoryError> {
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(RepositoryError::NotFound(id))?.try_into()
    }

    async fn create(&self, place: NewPlace) -> Result<Place, RepositoryError> {
        let place = Place::from_new(Uuid::new_v4(), place, Utc::now());

        sqlx::query(&format!(
            "INSERT INTO places ({PLACE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        ))
        .bind(place.id)
        .bind(&place.name)
        .bind(&place.description)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(place.category.as_str())
        .bind(&place.image_url)
        .bind(place.rating)
        .bind(&place.address)
        .bind(&place.website)
        .bind(&place.phone_number)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(place)
    }

    async fn update(&self, id: Uuid, changes: PlaceChanges) -> Result<Place, RepositoryError> {
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            r#"
            UPDATE places SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                category = COALESCE($6, category),
                image_url = COALESCE($7, image_url),
                rating = COALESCE($8, rating),
                address = COALESCE($9, address),
                website = COALESCE($10, website),
                phone_number = COALESCE($11, phone_number),
                updated_at = $12
            WHERE id = $1
            RETURNING {PLACE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(changes.category.map(|category| category.as_str()))
        .bind(changes.image_url)
        .bind(changes.rating)
        .bind(changes.address)
        .bind(changes.website)
        .bind(changes.phone_number)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(RepositoryError::NotFound(id))?.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
