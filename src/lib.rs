//! tailor-fit library crate
//!
//! Exposes the fitting-room modules so the binary and tests can drive the
//! request lifecycle with or without the terminal UI.

pub mod app;
pub mod catalog;
pub mod config;
pub mod customization;
pub mod encoding;
pub mod export;
pub mod generator;
pub mod headless;
pub mod keyring;
pub mod lifecycle;
pub mod logging;
pub mod ui;
pub mod upload;
pub mod util;
