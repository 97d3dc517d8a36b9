#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use placemap_core::error::{ImportError, RepositoryError};
use placemap_core::geocoding::{GeocodeFailure, GeocodeResult, Geocoder};
use placemap_core::properties::{NewProperty, PropertyRecord, PropertyStore};
use placemap_core::sheet::SheetFetcher;
use tokio::net::TcpListener;

pub const HEADER: &str = "Calle,Colonia,Alcaldía,Precio,M2,Recámaras,Baños,Estacionamientos,Amenidades,Descripción,URL,Mantenimiento,Inmobiliaria";

pub fn sheet(lines: &[&str]) -> String {
    let mut text = String::from(HEADER);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text
}

/// Serves a fixed body and remembers which URLs were requested.
pub struct StaticFetcher {
    body: String,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.body.clone())
    }
}

/// Resolves every street except the ones listed as unknown, which answer
/// like the provider does for an address it cannot place.
pub struct ScriptedGeocoder {
    unknown_streets: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub fn resolving_all() -> Self {
        Self::with_unknown(&[])
    }

    pub fn with_unknown(streets: &[&str]) -> Self {
        Self {
            unknown_streets: streets.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(
        &self,
        street: &str,
        neighborhood: &str,
        municipality: &str,
    ) -> Result<GeocodeResult, GeocodeFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unknown_streets.contains(street) {
            return Err(GeocodeFailure::Status("ZERO_RESULTS".to_string()));
        }
        Ok(GeocodeResult {
            latitude: 19.43,
            longitude: -99.13,
            formatted_address: format!("{street}, {neighborhood}, {municipality}, CDMX"),
        })
    }
}

/// Wraps another store and rejects inserts for the listed streets.
pub struct RejectingStore<S> {
    pub inner: S,
    pub rejected_streets: HashSet<String>,
}

#[async_trait]
impl<S: PropertyStore> PropertyStore for RejectingStore<S> {
    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.inner.delete_all().await
    }

    async fn insert(&self, property: NewProperty) -> Result<PropertyRecord, RepositoryError> {
        if self.rejected_streets.contains(&property.row.street) {
            return Err(RepositoryError::Database(sqlx::Error::Protocol(
                "value too long for column".to_string(),
            )));
        }
        self.inner.insert(property).await
    }

    async fn list(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        self.inner.list().await
    }
}

pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}
