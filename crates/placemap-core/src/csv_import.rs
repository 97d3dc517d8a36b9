use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, warn};

/// Spreadsheet columns, in the order the source sheet lays them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetColumn {
    Street,
    Neighborhood,
    Municipality,
    Price,
    Area,
    Bedrooms,
    Bathrooms,
    Parking,
    Amenities,
    Description,
    ListingUrl,
    MaintenanceFee,
    Agency,
}

impl SheetColumn {
    pub const ALL: [SheetColumn; 13] = [
        SheetColumn::Street,
        SheetColumn::Neighborhood,
        SheetColumn::Municipality,
        SheetColumn::Price,
        SheetColumn::Area,
        SheetColumn::Bedrooms,
        SheetColumn::Bathrooms,
        SheetColumn::Parking,
        SheetColumn::Amenities,
        SheetColumn::Description,
        SheetColumn::ListingUrl,
        SheetColumn::MaintenanceFee,
        SheetColumn::Agency,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SheetColumn::Street => "Calle",
            SheetColumn::Neighborhood => "Colonia",
            SheetColumn::Municipality => "Alcaldía",
            SheetColumn::Price => "Precio",
            SheetColumn::Area => "M2",
            SheetColumn::Bedrooms => "Recámaras",
            SheetColumn::Bathrooms => "Baños",
            SheetColumn::Parking => "Estacionamientos",
            SheetColumn::Amenities => "Amenidades",
            SheetColumn::Description => "Descripción",
            SheetColumn::ListingUrl => "URL",
            SheetColumn::MaintenanceFee => "Mantenimiento",
            SheetColumn::Agency => "Inmobiliaria",
        }
    }
}

/// One spreadsheet line before geocoding. Optional values are carried as
/// the sheet's text; nothing here coerces them to numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
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
}

impl ImportRow {
    pub fn has_required_fields(&self) -> bool {
        [&self.street, &self.neighborhood, &self.municipality]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

/// Header position of every known column; `None` when the sheet lacks it.
struct ColumnIndex {
    positions: [Option<usize>; 13],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let names: Vec<&str> = headers.iter().collect();
        let mut positions = [None; 13];
        for (slot, column) in positions.iter_mut().zip(SheetColumn::ALL.iter()) {
            // A repeated header resolves to its last occurrence.
            *slot = names.iter().rposition(|name| *name == column.header());
        }
        Self { positions }
    }

    fn text(&self, record: &StringRecord, column: SheetColumn) -> String {
        self.positions[column as usize]
            .and_then(|index| record.get(index))
            .unwrap_or("")
            .trim()
            .to_string()
    }

    fn optional(&self, record: &StringRecord, column: SheetColumn) -> Option<String> {
        Some(self.text(record, column)).filter(|value| !value.is_empty())
    }

    fn row(&self, record: &StringRecord) -> ImportRow {
        ImportRow {
            street: self.text(record, SheetColumn::Street),
            neighborhood: self.text(record, SheetColumn::Neighborhood),
            municipality: self.text(record, SheetColumn::Municipality),
            price: self.optional(record, SheetColumn::Price),
            area: self.optional(record, SheetColumn::Area),
            bedrooms: self.optional(record, SheetColumn::Bedrooms),
            bathrooms: self.optional(record, SheetColumn::Bathrooms),
            parking: self.optional(record, SheetColumn::Parking),
            amenities: self.optional(record, SheetColumn::Amenities),
            description: self.optional(record, SheetColumn::Description),
            listing_url: self.optional(record, SheetColumn::ListingUrl),
            maintenance_fee: self.optional(record, SheetColumn::MaintenanceFee),
            agency: self.optional(record, SheetColumn::Agency),
        }
    }
}

/// Parses a CSV export into rows that carry street, neighborhood and
/// municipality. Rows lacking any of the three are dropped here; input with
/// no data lines yields an empty list.
pub fn parse_rows(text: &str) -> Vec<ImportRow> {
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            warn!(error = %err, "Could not read CSV header row");
            return Vec::new();
        }
    };
    let columns = ColumnIndex::from_headers(&headers);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(line = line + 2, error = %err, "Dropping unreadable CSV record");
                continue;
            }
        };

        let row = columns.row(&record);
        if row.has_required_fields() {
            rows.push(row);
        } else {
            debug!(line = line + 2, "Dropping CSV record without street, neighborhood and municipality");
        }
    }

    rows
}
