//! CLI output formatting.
//!
//! Output is **information-centric, not file-centric**: the check command
//! shows what the page will say, the build command shows what was written.
//! File paths appear as secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Site
//!     Homepage: https://example.com
//!     Author: Jane Doe
//!     Banner: jan[e]doe
//!     Tagline: Software, mostly.
//! Social
//!     email: (obfuscated)
//!     github: janedoe
//!     twitter: janedoe
//! Avatar
//!     Source: profile-pic.png (200x200)
//!     Display: 50x50
//! ```
//!
//! ## Build
//!
//! ```text
//! Avatar
//!     1x avatar-50.avif: encoded
//!     2x avatar-100.avif: cached
//! Page → dist/index.html
//! Cache: 1 cached, 1 encoded, 2 total
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::avatar::{AvatarVariant, VariantStatus};
use crate::compose::split_banner;
use crate::generate::BuildReport;
use crate::metadata::SiteMetadata;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Banner as the heading will show it, middle character bracketed.
fn banner_preview(banner: &str) -> String {
    match split_banner(banner) {
        (before, Some(middle), after) => format!("{before}[{middle}]{after}"),
        (_, None, _) => banner.to_string(),
    }
}

fn variant_line(variant: &AvatarVariant) -> String {
    let status = match variant.status {
        VariantStatus::Cached => "cached",
        VariantStatus::Encoded => "encoded",
    };
    format!(
        "{}{}x {}: {}",
        indent(1),
        variant.scale,
        variant.src,
        status
    )
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(meta: &SiteMetadata) -> Vec<String> {
    let mut lines = vec!["Site".to_string()];
    lines.push(format!("{}Homepage: {}", indent(1), meta.homepage));
    lines.push(format!("{}Author: {}", indent(1), meta.author));
    lines.push(format!("{}Banner: {}", indent(1), banner_preview(&meta.banner)));
    if let Some(tagline) = &meta.tagline {
        lines.push(format!("{}Tagline: {}", indent(1), tagline));
    }
    if let Some(bio) = &meta.bio {
        lines.push(format!("{}Bio: {}", indent(1), truncate(bio, 60)));
    }
    if let Some(blog) = &meta.blog {
        lines.push(format!("{}Blog: {}", indent(1), blog));
    }

    let social = &meta.social;
    let entries = [
        ("email", social.email.as_ref().map(|_| "(obfuscated)")),
        ("github", social.github.as_deref()),
        ("twitter", social.twitter.as_deref()),
        ("stack overflow", social.stack_overflow.as_deref()),
    ];
    let present: Vec<_> = entries
        .iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect();
    if !present.is_empty() {
        lines.push("Social".to_string());
        for (label, value) in present {
            lines.push(format!("{}{}: {}", indent(1), label, value));
        }
    }

    let avatar = &meta.avatar;
    lines.push("Avatar".to_string());
    lines.push(format!(
        "{}Source: {} ({}x{})",
        indent(1),
        avatar.relative,
        avatar.native.width,
        avatar.native.height
    ));
    lines.push(format!(
        "{}Display: {}x{}",
        indent(1),
        avatar.width,
        avatar.height
    ));
    lines
}

pub fn print_check_output(meta: &SiteMetadata) {
    for line in format_check_output(meta) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Avatar".to_string()];
    lines.extend(report.variants.iter().map(variant_line));
    lines.push(format!("Page → {}", report.index_path.display()));
    lines.push(format!("Cache: {}", report.cache_stats));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
