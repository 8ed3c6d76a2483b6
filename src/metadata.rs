//! Site metadata resolution.
//!
//! [`resolve`] is the single read operation of the build's metadata
//! provider: it loads `config.toml`, checks the required fields, locates the
//! avatar under the content root, and returns an immutable [`SiteMetadata`].
//! Nothing downstream reads configuration again; the composer and renderer
//! receive the resolved value explicitly.
//!
//! ## Failure policy
//!
//! Missing or invalid metadata is fatal. A page without an author or an
//! avatar is wrong output, not degraded output, so there are no defaults for
//! `homepage`, `author`, or the avatar file and no retries.
//!
//! | Problem | Error |
//! |---|---|
//! | `site.homepage` / `site.author` absent or blank | [`MetadataError::MissingField`] |
//! | no file matches `site.avatar.pattern` | [`MetadataError::MissingAsset`] |
//! | homepage is not an absolute URL | [`MetadataError::InvalidUrl`] |
//! | `social.email` does not decode to an address | [`MetadataError::InvalidEmail`] |
//! | avatar is not JPEG, PNG, TIFF, or WebP | [`MetadataError::UnsupportedFormat`] |
//!
//! ## Normalization
//!
//! Optional strings are trimmed and blank values treated as absent. Social
//! handles lose a leading `@`.
//!
//! ## Avatar lookup
//!
//! The content root is walked in file-name order and the first file whose
//! name equals the pattern wins. A pattern containing `/` is matched against
//! the end of the relative path instead (`images/me.png`), which
//! disambiguates when several directories hold a file of the same name.

use crate::config::{self, ConfigError, SiteConfig};
use crate::imaging::{BackendError, Dimensions, ImageBackend, RustBackend, SUPPORTED_EXTENSIONS};
use crate::obfuscate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Display size of the avatar, in CSS pixels, on both axes.
pub const AVATAR_SIZE: u32 = 50;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("No avatar matching '{pattern}' found under {}", .root.display())]
    MissingAsset { pattern: String, root: PathBuf },
    #[error("site.homepage is not an absolute URL: {url}")]
    InvalidUrl { url: String },
    #[error("social.email is not a valid address: {0}")]
    InvalidEmail(String),
    #[error("Unsupported avatar format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("Failed to read avatar: {0}")]
    Imaging(#[from] BackendError),
    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Author and site facts for one build. Never mutated after [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMetadata {
    pub homepage: String,
    pub author: String,
    /// Heading text, `author` unless overridden.
    pub banner: String,
    pub tagline: Option<String>,
    /// Inline markdown continuing the "Written by" line.
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub social: Social,
    pub avatar: AvatarAsset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Social {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub stack_overflow: Option<String>,
    /// Character-reference encoded `mailto:` destination.
    pub email: Option<String>,
}

/// Avatar source file plus the fixed size it is displayed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarAsset {
    pub source: PathBuf,
    /// Path relative to the content root, `/`-separated.
    pub relative: String,
    pub native: Dimensions,
    pub width: u32,
    pub height: u32,
    pub quality: u32,
}

/// Resolve metadata for the content root, reading `config.toml` once.
pub fn resolve(content_root: &Path) -> Result<SiteMetadata, MetadataError> {
    let config = config::load_config(content_root)?;
    resolve_from(&config, content_root, &RustBackend::new())
}

/// Resolve metadata from an already loaded config.
///
/// The backend is only used to read the avatar's native dimensions.
pub fn resolve_from(
    config: &SiteConfig,
    content_root: &Path,
    backend: &impl ImageBackend,
) -> Result<SiteMetadata, MetadataError> {
    let site = &config.site;

    let homepage = required(site.homepage.as_deref(), "site.homepage")?;
    let author = required(site.author.as_deref(), "site.author")?;
    validate_homepage(&homepage)?;

    let social = Social {
        twitter: handle(config.social.twitter.as_deref()),
        github: handle(config.social.github.as_deref()),
        stack_overflow: handle(config.social.stack_overflow.as_deref()),
        email: optional(config.social.email.as_deref())
            .map(|e| encode_email(&e))
            .transpose()?,
    };

    let pattern = site.avatar.pattern.trim();
    let source = find_asset(content_root, pattern)?.ok_or_else(|| MetadataError::MissingAsset {
        pattern: pattern.to_string(),
        root: content_root.to_path_buf(),
    })?;
    if !is_supported(&source) {
        return Err(MetadataError::UnsupportedFormat { path: source });
    }
    let native = backend.identify(&source)?;
    debug!(
        "avatar {} is {}x{}",
        source.display(),
        native.width,
        native.height
    );

    Ok(SiteMetadata {
        banner: optional(site.banner.as_deref()).unwrap_or_else(|| author.clone()),
        tagline: optional(site.tagline.as_deref()),
        bio: optional(site.bio.as_deref()),
        blog: optional(site.blog.as_deref()),
        social,
        avatar: AvatarAsset {
            relative: relative_path(content_root, &source),
            source,
            native,
            width: AVATAR_SIZE,
            height: AVATAR_SIZE,
            quality: site.avatar.quality,
        },
        homepage,
        author,
    })
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, MetadataError> {
    optional(value).ok_or(MetadataError::MissingField(field))
}

fn handle(value: Option<&str>) -> Option<String> {
    optional(value.map(|v| v.trim().trim_start_matches('@')))
}

fn validate_homepage(homepage: &str) -> Result<(), MetadataError> {
    match url::Url::parse(homepage) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(MetadataError::InvalidUrl {
            url: homepage.to_string(),
        }),
    }
}

/// Plain addresses are encoded; already encoded strings are kept byte-for-byte.
///
/// An encoded value must consist solely of numeric character references,
/// since it is emitted into the page without escaping.
fn encode_email(raw: &str) -> Result<String, MetadataError> {
    if obfuscate::is_encoded(raw) {
        if !obfuscate::is_fully_encoded(raw) {
            return Err(MetadataError::InvalidEmail(raw.to_string()));
        }
        let decoded =
            obfuscate::decode(raw).map_err(|e| MetadataError::InvalidEmail(e.to_string()))?;
        if !obfuscate::is_valid_mailto(&decoded) {
            return Err(MetadataError::InvalidEmail(decoded));
        }
        return Ok(raw.to_string());
    }
    let address = raw.strip_prefix("mailto:").unwrap_or(raw);
    if !obfuscate::is_valid_address(address) {
        return Err(MetadataError::InvalidEmail(raw.to_string()));
    }
    Ok(obfuscate::encode(address))
}

/// Find the first file under `root` matching `pattern`.
pub fn find_asset(root: &Path, pattern: &str) -> Result<Option<PathBuf>, MetadataError> {
    let suffix = pattern.trim_start_matches('/');
    let by_path = suffix.contains('/');

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matched = if by_path {
            let rel = relative_path(root, entry.path());
            rel == suffix || rel.ends_with(&format!("/{suffix}"))
        } else {
            entry.file_name().to_str() == Some(suffix)
        };
        if matched {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
