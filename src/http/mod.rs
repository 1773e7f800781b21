//! HTTP server module exposing the timetable submission API (§6).
//!
//! An axum router with one resource, `/api/v1/timetables`: `POST` runs the
//! optimizer over a submitted proposal batch and stores the result;
//! `GET`/`PUT`/`DELETE` operate on the in-memory store by id.

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
