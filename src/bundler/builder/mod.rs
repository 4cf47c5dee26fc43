//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that runs the
//! installer pipeline.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for the installer
//! - [`orchestrator`] - Main [`Bundler`] struct and the pipeline
//! - [`staging`] - Driving `setup.py` into the staging tree

mod checksum;
mod orchestrator;
mod staging;

pub use orchestrator::{BundleReport, Bundler};
