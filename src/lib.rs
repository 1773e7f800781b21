//! # SKA Scheduler
//!
//! Evolutionary scheduling engine for astronomical observation proposals.
//!
//! This crate assigns observation proposals to concrete start times inside a
//! fixed multi-day planning horizon, subject to per-proposal temporal and
//! astronomical constraints. The output is a timetable: a set of
//! `(proposal, start-instant)` bindings that approximately maximizes an
//! objective combining coverage, non-overlap, and soft preference
//! satisfaction.
//!
//! ## Architecture
//!
//! - [`astro`]: Julian date, GMST, LST↔UTC conversion, sunrise/sunset and
//!   night-window primitives.
//! - [`model`]: Proposal records, the feasibility predicate, and the
//!   schedule representation (clash detection, repair).
//! - [`fitness`]: The scalar objective driving selection.
//! - [`optimizer`]: Direct-encoding genetic optimizer and the hyper-heuristic
//!   alternative encoding.
//! - [`driver`]: Orchestration — loads proposals, pre-filters, runs an
//!   optimizer, returns the best schedule.
//! - [`ingest`]: CSV proposal ingestion.
//! - [`db`]: In-memory timetable storage (Repository pattern).
//! - [`http`]: Axum-based HTTP server exposing the submission API.
//! - [`config`]: Site constants and optimizer hyper-parameters, loaded from
//!   TOML.
//! - [`error`]: Crate-wide error taxonomy.

#![allow(clippy::result_large_err)]

pub mod astro;
pub mod config;
pub mod db;
pub mod driver;
pub mod error;
pub mod fitness;
pub mod ingest;
pub mod model;
pub mod optimizer;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{SchedulerError, SchedulerResult};
