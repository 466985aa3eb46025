//! Telemetry dataset model.
//!
//! These structures are what the pipeline produces and what the renderers
//! serialize. JSON field names follow the visualization front end's types.

mod dataset;
mod record;
mod swarm;

pub use dataset::*;
pub use record::*;
pub use swarm::*;
