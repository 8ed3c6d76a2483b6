//! Image processing — pure Rust, no system libraries.
//!
//! - **Parameters**: what to produce ([`ThumbnailParams`], [`Quality`])
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//!
//! The avatar pipeline in [`crate::avatar`] decides sizes and file names and
//! hands fully specified parameters to the backend.

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use params::{Quality, Sharpening, ThumbnailParams};
pub use rust_backend::{RustBackend, SUPPORTED_EXTENSIONS};
