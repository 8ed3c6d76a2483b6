//! Derived avatar images.
//!
//! The avatar is displayed at [`AVATAR_SIZE`] × [`AVATAR_SIZE`] CSS pixels
//! whatever the source resolution. Two square AVIF crops are written next to
//! `index.html`:
//!
//! ```text
//! dist/
//! ├── avatar-50.avif     # 1x
//! └── avatar-100.avif    # 2x, only when the source is at least 100px
//! ```
//!
//! The 1x variant is always produced, upscaling a tiny source if needed, so
//! the page never references a missing file. A variant the current source no
//! longer warrants is deleted along with its cache entry.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::imaging::{BackendError, ImageBackend, Quality, Sharpening, ThumbnailParams};
use crate::metadata::{AVATAR_SIZE, AvatarAsset};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Pixel-density multipliers to generate.
pub const SCALES: &[u32] = &[1, 2];

/// How a variant ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    Cached,
    Encoded,
}

/// One derived avatar file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarVariant {
    pub scale: u32,
    /// File name relative to the output directory.
    pub src: String,
    pub edge: u32,
    pub status: VariantStatus,
}

pub fn variant_filename(edge: u32) -> String {
    format!("avatar-{edge}.avif")
}

/// Plan the crops for an asset: `(scale, edge)` pairs, 1x first.
pub fn plan_variants(asset: &AvatarAsset) -> Vec<(u32, u32)> {
    SCALES
        .iter()
        .map(|&scale| (scale, AVATAR_SIZE * scale))
        .filter(|&(scale, edge)| scale == 1 || asset.native.short_edge() >= edge)
        .collect()
}

/// `srcset` value for the variants, e.g. `avatar-50.avif 1x, avatar-100.avif 2x`.
pub fn srcset(variants: &[AvatarVariant]) -> String {
    variants
        .iter()
        .map(|v| format!("{} {}x", v.src, v.scale))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the avatar variants into `output_dir`, reusing cached encodes.
pub fn process_avatar(
    backend: &impl ImageBackend,
    asset: &AvatarAsset,
    output_dir: &Path,
    cache: &mut CacheManifest,
) -> Result<(Vec<AvatarVariant>, CacheStats), BackendError> {
    let source_hash = cache::hash_file(&asset.source)?;
    let quality = Quality::new(asset.quality);
    let sharpening = Sharpening::light();
    let mut stats = CacheStats::default();
    let mut variants = Vec::new();
    let plan = plan_variants(asset);

    for &(scale, edge) in &plan {
        let filename = variant_filename(edge);
        let params_hash = cache::hash_avatar_params(
            edge,
            quality.value(),
            Some((sharpening.sigma, sharpening.threshold)),
        );

        let status = match cache.find_cached(&source_hash, &params_hash, output_dir) {
            Some(_) => {
                stats.hits += 1;
                VariantStatus::Cached
            }
            None => {
                backend.thumbnail(&ThumbnailParams {
                    source: asset.source.clone(),
                    output: output_dir.join(&filename),
                    crop_width: edge,
                    crop_height: edge,
                    quality,
                    sharpening: Some(sharpening),
                })?;
                stats.misses += 1;
                VariantStatus::Encoded
            }
        };
        debug!("{filename}: {status:?}");

        cache.insert(filename.clone(), source_hash.clone(), params_hash);
        variants.push(AvatarVariant {
            scale,
            src: filename,
            edge,
            status,
        });
    }

    remove_stale_variants(&plan, output_dir, cache)?;
    Ok((variants, stats))
}

/// Delete variant files outside `plan` and forget them in the cache.
fn remove_stale_variants(
    plan: &[(u32, u32)],
    output_dir: &Path,
    cache: &mut CacheManifest,
) -> Result<(), BackendError> {
    let keep: Vec<String> = plan.iter().map(|&(_, edge)| variant_filename(edge)).collect();
    cache.retain_outputs(&keep);

    for &scale in SCALES {
        let filename = variant_filename(AVATAR_SIZE * scale);
        let path = output_dir.join(&filename);
        if !keep.contains(&filename) && path.exists() {
            std::fs::remove_file(&path)?;
            debug!("{filename}: removed");
        }
    }
    Ok(())
}
