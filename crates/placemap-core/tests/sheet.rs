mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use common::{closed_addr, spawn_server, ScriptedGeocoder, HEADER};
use placemap_core::config::SheetConfig;
use placemap_core::error::ImportError;
use placemap_core::import::SheetImporter;
use placemap_core::memory::MemoryPropertyStore;
use placemap_core::sheet::{looks_like_html, HttpSheetFetcher, SheetFetcher};
use placemap_core::throttle::Throttle;

async fn csv_export() -> String {
    format!("{HEADER}\nDurango 200,Roma Norte,Cuauhtémoc\nColima 3,Roma Norte,Cuauhtémoc\n")
}

async fn sign_in_page() -> &'static str {
    "\n  <!DOCTYPE html>\n<html lang=\"es\"><body>Inicia sesión</body></html>"
}

async fn missing() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn sheet_server() -> Router {
    Router::new()
        .route("/export.csv", get(csv_export))
        .route("/private.csv", get(sign_in_page))
        .route("/missing.csv", get(missing))
}

#[tokio::test]
async fn fetches_export_text() {
    let addr = spawn_server(sheet_server()).await;
    let fetcher = HttpSheetFetcher::new().expect("client");

    let text = fetcher
        .fetch(&format!("http://{addr}/export.csv"))
        .await
        .expect("fetched");

    assert!(text.starts_with(HEADER));
    assert!(text.contains("Colima 3"));
}

#[tokio::test]
async fn error_status_is_source_unavailable() {
    let addr = spawn_server(sheet_server()).await;
    let fetcher = HttpSheetFetcher::new().expect("client");

    let err = fetcher
        .fetch(&format!("http://{addr}/missing.csv"))
        .await
        .expect_err("404");

    assert!(matches!(err, ImportError::SourceUnavailable(_)));
}

#[tokio::test]
async fn unreachable_source_is_source_unavailable() {
    let addr = closed_addr().await;
    let fetcher = HttpSheetFetcher::new().expect("client");

    let err = fetcher
        .fetch(&format!("http://{addr}/export.csv"))
        .await
        .expect_err("refused");

    assert!(matches!(err, ImportError::SourceUnavailable(_)));
}

#[tokio::test]
async fn private_sheet_over_http_is_rejected_before_deleting() {
    let addr = spawn_server(sheet_server()).await;
    let store = Arc::new(MemoryPropertyStore::new());
    let importer = SheetImporter::new(
        SheetConfig {
            published_url: Some(format!("http://{addr}/private.csv")),
            ..SheetConfig::default()
        },
        Arc::new(HttpSheetFetcher::new().expect("client")),
        Arc::new(ScriptedGeocoder::resolving_all()),
        store,
        Throttle::disabled(),
    );

    let err = importer.run().await.expect_err("private sheet");

    assert!(matches!(err, ImportError::SourceNotPublic { .. }));
}

#[tokio::test]
async fn public_sheet_over_http_imports() {
    let addr = spawn_server(sheet_server()).await;
    let store = Arc::new(MemoryPropertyStore::new());
    let importer = SheetImporter::new(
        SheetConfig {
            published_url: Some(format!("http://{addr}/export.csv")),
            ..SheetConfig::default()
        },
        Arc::new(HttpSheetFetcher::new().expect("client")),
        Arc::new(ScriptedGeocoder::resolving_all()),
        store.clone(),
        Throttle::disabled(),
    );

    let summary = importer.run().await.expect("imported");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.success, 2);
    assert_eq!(store.len().await, 2);
}

#[test]
fn html_detection_ignores_case_and_leading_whitespace() {
    assert!(looks_like_html("<!DOCTYPE html><html></html>"));
    assert!(looks_like_html("  \n<!doctype html>"));
    assert!(looks_like_html("<HTML><body></body></HTML>"));
    assert!(!looks_like_html("Calle,Colonia,Alcaldía\n"));
    assert!(!looks_like_html("Calle,Descripción\nMadero 1,\"<html> en texto\""));
}
