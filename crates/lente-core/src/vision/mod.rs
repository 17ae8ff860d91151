//! Azure Computer Vision integration.
//!
//! Provides a backend abstraction over the two generations of the analysis
//! API (unified Image Analysis 4.0 and legacy v3.2) plus the startup probe
//! that picks one of them for the lifetime of the run.

pub(crate) mod backend;
pub(crate) mod legacy;
pub(crate) mod unified;

pub use backend::{connect, VisionBackend};
pub use legacy::LegacyVisionBackend;
pub use unified::UnifiedVisionBackend;
