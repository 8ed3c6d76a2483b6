//! Landing page generation.
//!
//! Runs the whole build for one content root:
//!
//! ```text
//! config.toml ─→ resolve ─→ SiteMetadata ─┬─→ compose ─→ Node ─→ render ─→ index.html
//!                                         └─→ process_avatar ─→ avatar-*.avif
//! ```
//!
//! Metadata is resolved before anything touches the output directory, so a
//! missing field or avatar leaves `dist/` exactly as it was.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html              # Single page, CSS inlined
//! ├── avatar-50.avif          # 1x avatar
//! ├── avatar-100.avif         # 2x avatar (sources >= 100px)
//! └── .cache-manifest.json    # Encoding cache for the next build
//! ```

use crate::avatar::{self, AvatarVariant};
use crate::cache::{CacheManifest, CacheStats};
use crate::compose;
use crate::config::{self, ConfigError};
use crate::imaging::{BackendError, ImageBackend};
use crate::metadata::{self, MetadataError, SiteMetadata};
use crate::render;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("Avatar processing failed: {0}")]
    Imaging(#[from] BackendError),
}

/// What a build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub metadata: SiteMetadata,
    pub variants: Vec<AvatarVariant>,
    pub cache_stats: CacheStats,
    pub index_path: PathBuf,
}

/// Build the landing page from `source` into `output`.
///
/// With `use_cache` off the previous cache manifest is ignored and every
/// avatar variant is re-encoded; the fresh manifest is still written.
pub fn build(
    source: &Path,
    output: &Path,
    backend: &impl ImageBackend,
    use_cache: bool,
) -> Result<BuildReport, GenerateError> {
    let config = config::load_config(source)?;
    let meta = metadata::resolve_from(&config, source, backend)?;
    info!("resolved metadata for {}", meta.author);

    fs::create_dir_all(output)?;
    let mut cache = if use_cache {
        CacheManifest::load(output)
    } else {
        CacheManifest::empty()
    };
    debug!("cache manifest has {} entries", cache.len());

    let (variants, cache_stats) =
        avatar::process_avatar(backend, &meta.avatar, output, &mut cache)?;

    let tree = compose::compose(&meta);
    let css = render::stylesheet(&config);
    let page = render::render_page(&tree, &meta, &variants, &css);
    let index_path = output.join("index.html");
    fs::write(&index_path, page.into_string())?;
    info!("wrote {}", index_path.display());

    cache.save(output)?;

    Ok(BuildReport {
        metadata: meta,
        variants,
        cache_stats,
        index_path,
    })
}
