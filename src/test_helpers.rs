//! Shared test utilities for the simple-folio test suite.
//!
//! Fixtures are built in temp directories on the fly: a `config.toml` and a
//! real PNG are all a content root needs.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! let meta = crate::metadata::resolve(tmp.path()).unwrap();
//! assert_eq!(meta.author, "Jane Doe");
//! ```

use crate::imaging::Dimensions;
use crate::metadata::{AVATAR_SIZE, AvatarAsset, SiteMetadata, Social};
use crate::obfuscate;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Config with every field the page can show.
pub const FULL_CONFIG: &str = r#"
[site]
homepage = "https://example.com"
author = "Jane Doe"
tagline = "Software, mostly."
bio = "a software engineer living in Berlin."

[social]
email = "jane@example.com"
github = "janedoe"
twitter = "@janedoe"
stack_overflow = "janedoe"
"#;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `config.toml` into a content root.
pub fn write_config(dir: &Path, toml: &str) {
    std::fs::write(dir.join("config.toml"), toml).unwrap();
}

/// Write a solid-colour PNG and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb([180, 120, 90]))
        .save(&path)
        .unwrap();
    path
}

/// Content root with [`FULL_CONFIG`] and a 200×200 `profile-pic.png`.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), FULL_CONFIG);
    write_png(tmp.path(), "profile-pic.png", 200, 200);
    tmp
}

// =========================================================================
// Resolved values
// =========================================================================

/// Metadata equivalent to resolving [`FULL_CONFIG`], without touching disk.
pub fn sample_metadata() -> SiteMetadata {
    SiteMetadata {
        homepage: "https://example.com".into(),
        author: "Jane Doe".into(),
        banner: "Jane Doe".into(),
        tagline: Some("Software, mostly.".into()),
        bio: Some("a software engineer living in Berlin.".into()),
        blog: None,
        social: Social {
            twitter: Some("janedoe".into()),
            github: Some("janedoe".into()),
            stack_overflow: Some("janedoe".into()),
            email: Some(obfuscate::encode("jane@example.com")),
        },
        avatar: AvatarAsset {
            source: PathBuf::from("/content/profile-pic.png"),
            relative: "profile-pic.png".into(),
            native: Dimensions {
                width: 200,
                height: 200,
            },
            width: AVATAR_SIZE,
            height: AVATAR_SIZE,
            quality: 90,
        },
    }
}
