//! Environmental time-series viewer and random-data demo.
//!
//! The viewer loads an instrument export (`.txt`/`.csv`), skips its
//! metadata block, drops blank and `SDI` diagnostic rows, finds the time
//! column and plots a chosen variable with a rolling ±1 std band.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod demo;
pub mod export;
pub mod pipeline;
pub mod state;
pub mod stats;
pub mod ui;
