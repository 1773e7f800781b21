//! External proposal ingestion. CSV is the only source implemented here;
//! the JSON submission body is handled directly by the HTTP layer (§6).

pub mod csv;

pub use csv::ingest;
