pub mod chat;
pub mod config;
pub mod csv_import;
pub mod db;
pub mod error;
pub mod geocoding;
pub mod import;
pub mod memory;
pub mod places;
pub mod properties;
pub mod seed;
pub mod sheet;
pub mod throttle;
