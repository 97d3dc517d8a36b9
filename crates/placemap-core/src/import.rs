//! Spreadsheet-to-database synchronization.
//!
//! Every run replaces the whole `properties` table: the export is fetched and
//! parsed, existing records are deleted, then each row is geocoded and written
//! one at a time with a fixed pause between rows. Per-row problems land in the
//! returned [`ImportSummary`]; only conditions that prevent any row from being
//! processed surface as [`ImportError`].
//!
//! The delete and the inserts are not wrapped in a transaction. A run that
//! dies midway leaves the table holding only the rows written so far.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::SheetConfig;
use crate::csv_import::{parse_rows, ImportRow};
use crate::error::ImportError;
use crate::geocoding::Geocoder;
use crate::properties::{NewProperty, PropertyStore};
use crate::sheet::{looks_like_html, SheetFetcher};
use crate::throttle::Throttle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Imported { id: Uuid },
    Skipped,
    GeocodeFailed { reason: String },
    PersistFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowReport {
    /// 1-based position among the parsed rows.
    pub position: usize,
    pub street: String,
    pub neighborhood: String,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub rows: Vec<RowReport>,
    /// BLAKE3 hex digest of the fetched export.
    pub source_hash: String,
}

impl ImportSummary {
    fn new(total: usize, source_hash: String) -> Self {
        Self {
            total,
            source_hash,
            ..Self::default()
        }
    }

    fn record(&mut self, report: RowReport) {
        match &report.outcome {
            RowOutcome::Imported { .. } => self.success += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::GeocodeFailed { reason } => {
                self.failed += 1;
                self.errors.push(format!(
                    "Failed to geocode: {}, {} ({reason})",
                    report.street, report.neighborhood
                ));
            }
            RowOutcome::PersistFailed { reason } => {
                self.failed += 1;
                self.errors
                    .push(format!("Error processing {}: {reason}", report.street));
            }
        }
        self.rows.push(report);
    }

    /// Every parsed row is accounted for exactly once.
    pub fn is_balanced(&self) -> bool {
        self.total == self.success + self.failed + self.skipped
    }
}

pub struct SheetImporter {
    sheet: SheetConfig,
    fetcher: Arc<dyn SheetFetcher>,
    geocoder: Arc<dyn Geocoder>,
    store: Arc<dyn PropertyStore>,
    throttle: Throttle,
}

impl SheetImporter {
    pub fn new(
        sheet: SheetConfig,
        fetcher: Arc<dyn SheetFetcher>,
        geocoder: Arc<dyn Geocoder>,
        store: Arc<dyn PropertyStore>,
        throttle: Throttle,
    ) -> Self {
        Self {
            sheet,
            fetcher,
            geocoder,
            store,
            throttle,
        }
    }

    pub async fn run(&self) -> Result<ImportSummary, ImportError> {
        let url = self.sheet.export_url()?;
        info!(%url, "Fetching spreadsheet export");

        let text = self.fetcher.fetch(&url).await?;
        if looks_like_html(&text) {
            warn!(%url, "Spreadsheet export returned HTML; the sheet is not shared publicly");
            return Err(ImportError::source_not_public());
        }

        let source_hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        let rows = parse_rows(&text);
        let total = rows.len();
        info!(rows = total, source_hash = %source_hash, "Parsed properties from sheet");

        let mut summary = ImportSummary::new(total, source_hash);

        let removed = self.store.delete_all().await?;
        info!(removed, "Cleared existing properties");

        for (index, row) in rows.into_iter().enumerate() {
            if index > 0 {
                self.throttle.pause().await;
            }
            let report = self.import_row(index + 1, total, row).await;
            summary.record(report);
        }

        info!(
            total = summary.total,
            success = summary.success,
            failed = summary.failed,
            skipped = summary.skipped,
            "Import completed"
        );
        Ok(summary)
    }

    async fn import_row(&self, position: usize, total: usize, row: ImportRow) -> RowReport {
        let street = row.street.clone();
        let neighborhood = row.neighborhood.clone();
        let report = |outcome| RowReport {
            position,
            street: street.clone(),
            neighborhood: neighborhood.clone(),
            outcome,
        };

        if !row.has_required_fields() {
            return report(RowOutcome::Skipped);
        }

        info!("Processing {position}/{total}: {street}, {neighborhood}");

        let location = match self
            .geocoder
            .geocode(&row.street, &row.neighborhood, &row.municipality)
            .await
        {
            Ok(location) => location,
            Err(failure) => {
                return report(RowOutcome::GeocodeFailed {
                    reason: failure.to_string(),
                })
            }
        };

        match self.store.insert(NewProperty { row, location }).await {
            Ok(record) => report(RowOutcome::Imported { id: record.id }),
            Err(err) => {
                error!(%street, error = %err, "Error persisting property");
                report(RowOutcome::PersistFailed {
                    reason: err.to_string(),
                })
            }
        }
    }
}
