// Rickllow Listings - Core Library
// Read-only catalog of multiverse locations: query composition,
// row aggregation, and the schema accessor underneath them.
// Exposed for use by the CLI, the API server, and tests.

pub mod db;
pub mod error;
pub mod locations;
pub mod query;

// Re-export commonly used types
pub use db::{
    image_names, insert_agent, insert_image, insert_location, insert_review,
    location_row, review_rows, seed_demo_data, setup_database, summary_rows,
    LocationRecord, LocationRow, ReviewRow, SummaryRow,
};
pub use error::{Error, Result};
pub use locations::{
    get_by_name, list, list_by_category, AgentDoc, DetailDoc, ReviewDoc, SummaryDoc,
};
pub use query::{search_filter, Category, LocationFilter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
