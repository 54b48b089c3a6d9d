pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{source_for, ApiSource, FixtureSource, RetryPolicy};
pub use config::{cli::LocalStorage, Settings, SourceKind};
pub use core::{engine::GenerationEngine, pipeline::LandingPipeline};
pub use domain::model::{GenerationReport, Product};
pub use utils::error::{GeneratorError, Result};
