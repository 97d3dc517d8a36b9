pub mod error;
pub mod report;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use routes::router;
pub use state::AppState;
