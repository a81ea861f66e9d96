//! Upstream client module for the National Weather Service API.
//!
//! This module provides the `NwsClient` for loading the bundled zone feed
//! and fetching per-zone forecast data from `api.weather.gov`, plus the
//! `Upstream` trait the cache uses so tests can substitute a mock source.

pub mod client;
pub mod error;

pub use client::{FaultInjector, NwsClient, Upstream};
pub use error::ApiError;
