// Adapters layer: concrete product sources (fixture file, paginated API).

pub mod fixture;
pub mod http;
pub mod retry;

pub use fixture::FixtureSource;
pub use http::ApiSource;
pub use retry::RetryPolicy;

use crate::config::{Settings, SourceKind};
use crate::domain::ports::ProductSource;
use crate::utils::error::Result;

pub fn source_for(settings: &Settings) -> Result<Box<dyn ProductSource>> {
    match settings.source {
        SourceKind::File => Ok(Box::new(FixtureSource::new(settings.input_path()))),
        SourceKind::Api => Ok(Box::new(ApiSource::from_settings(settings)?)),
    }
}
