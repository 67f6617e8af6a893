//! Image pipeline.
//!
//! # Modules
//!
//! - [`asset`]: image identities (`ImageRef`), sizes and derivative descriptions
//! - [`process`]: decoding, fitting and lossless WebP encoding into a tree

mod asset;
mod process;

pub use asset::{Dimensions, ImageAsset, ImageRef, ImageRole};
pub use process::ImagePipeline;
