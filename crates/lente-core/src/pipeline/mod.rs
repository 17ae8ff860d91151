//! Image description pipeline components.
//!
//! - **discovery**: Find image files in the input directory
//! - **processor**: Orchestrates analyze, describe and persist per image

pub mod discovery;
pub mod processor;

// Re-exports for convenient access
pub use discovery::{list_images, IMAGE_EXTENSIONS};
pub use processor::ImagePipeline;
