//! Weighted career pathway quiz.
//!
//! The [`quiz`] module holds the headless core: a question flow controller that
//! records one answer per question and an outcome scorer that turns the answer
//! sheet into a ranked results page. Everything else in the crate (config,
//! logging, the HTTP router) is plumbing around that pair.

pub mod config;
pub mod error;
pub mod quiz;
pub mod telemetry;
