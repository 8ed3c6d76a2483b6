//! Image backend trait and shared types.
//!
//! The avatar pipeline needs two things from pixels: the native size of the
//! source (read while resolving metadata) and a square crop at a fixed edge.
//! [`ImageBackend`] exposes exactly those so tests can swap in a recorder.

use super::params::ThumbnailParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn short_edge(self) -> u32 {
        self.width.min(self.height)
    }
}

pub trait ImageBackend {
    /// Read image dimensions without decoding the full image where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Fill-resize and centre-crop, then encode to `params.output`.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::{Quality, Sharpening};
    use std::cell::RefCell;

    /// Backend that records operations instead of touching pixels.
    ///
    /// `identify` answers with a fixed size for any path.
    pub struct MockBackend {
        pub dimensions: Dimensions,
        pub operations: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Thumbnail {
            source: String,
            output: String,
            crop_width: u32,
            crop_height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                dimensions: Dimensions { width, height },
                operations: RefCell::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }

        pub fn thumbnail_count(&self) -> usize {
            self.operations
                .borrow()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Thumbnail { .. }))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .borrow_mut()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
            Ok(self.dimensions)
        }

        /// Records the call and writes a placeholder so cache lookups see a file.
        fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
            self.operations.borrow_mut().push(RecordedOp::Thumbnail {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                crop_width: params.crop_width,
                crop_height: params.crop_height,
                quality: params.quality.value(),
            });
            std::fs::write(&params.output, b"mock")?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(800, 600);
        let dims = backend.identify(Path::new("/content/me.png")).unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Identify("/content/me.png".to_string())]
        );
    }

    #[test]
    fn mock_records_thumbnail() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(800, 600);
        backend
            .thumbnail(&ThumbnailParams {
                source: "/content/me.png".into(),
                output: tmp.path().join("avatar-50.avif"),
                crop_width: 50,
                crop_height: 50,
                quality: Quality::new(85),
                sharpening: Some(Sharpening::light()),
            })
            .unwrap();

        assert_eq!(backend.thumbnail_count(), 1);
        assert!(tmp.path().join("avatar-50.avif").exists());
    }

    #[test]
    fn short_edge_picks_smaller_side() {
        assert_eq!(Dimensions { width: 640, height: 480 }.short_edge(), 480);
        assert_eq!(Dimensions { width: 30, height: 90 }.short_edge(), 30);
    }
}
