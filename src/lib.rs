//! packcheck - dependency freshness checker library
//!
//! This library analyzes a dependency manifest against its public registry
//! and regenerates the manifest with selected upgrades applied:
//! - Node.js (package.json, npm registry)
//! - Python (requirements.txt, PyPI)
//! - Dart/Flutter (pubspec.yaml, pub.dev)

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
