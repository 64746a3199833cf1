//! # enigh-dashboard
//!
//! A desktop dashboard for the ENIGH household energy-consumption analysis.
//!
//! The statistical work (PCA, variable networks, centrality) happens upstream
//! and lands as CSV artifacts in `<base>/outputs/`; raw survey tables live in
//! `<base>/ENIGH/<year>/`.  This crate loads those tables, derives readable
//! labels, filters them and renders tables and charts.
//!
//! ## Modules
//!
//! - [`data`]: table model, memoizing loader, label enrichment, filters, export
//! - [`config`]: base directory resolution and settings
//! - [`state`]: UI state independent of rendering
//! - [`app`] / [`ui`]: the `eframe` application

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
