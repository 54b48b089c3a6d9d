pub mod engine;
pub mod normalize;
pub mod pipeline;
pub mod seo;

pub use crate::domain::model::{GenerationResult, Product};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
