//! Pipeline configuration.
//!
//! A pipeline is a list of registered operator ids with parameters, loaded
//! from TOML or JSON and turned into an [`Expression`](crate::expression::Expression)
//! by [`OperatorRegistry::build`](crate::filters::OperatorRegistry::build).

pub mod params;
pub mod pipeline;

pub use params::Parameters;
pub use pipeline::{PipelineConfig, StepConfig};
