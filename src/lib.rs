//! # Simple Folio
//!
//! A landing page generator for a single author. One `config.toml` and one
//! picture become a static page: a banner with the author's name and a
//! highlighted middle initial, a tagline, a "Written by" bio line, an avatar
//! linking home, and icon links to the author's profiles.
//!
//! # Architecture: Resolve, Compose, Render
//!
//! ```text
//! 1. Resolve   content/config.toml + avatar  →  SiteMetadata   (metadata)
//! 2. Compose   SiteMetadata                  →  Node tree      (compose)
//! 3. Render    Node tree + CSS               →  index.html     (render)
//! ```
//!
//! Resolution is the only step that can fail. Once it returns, composition
//! and rendering are pure functions of their inputs: composing the same
//! metadata twice yields deep-equal trees, and the tree can be inspected as
//! JSON (`simple-folio tree`) without rendering anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, stock defaults, validation, CSS variables |
//! | [`metadata`] | Required-field checks, avatar lookup, resolved [`metadata::SiteMetadata`] |
//! | [`obfuscate`] | Character-reference encoding of the `mailto:` link |
//! | [`tree`] | Renderer-agnostic display tree |
//! | [`compose`] | Metadata → display tree, inline markdown for the bio |
//! | [`render`] | Display tree → HTML using Maud |
//! | [`imaging`] | Pure-Rust image operations: identify, crop, AVIF encode |
//! | [`avatar`] | 1x/2x avatar variants |
//! | [`cache`] | Content-addressed encoding cache |
//! | [`generate`] | The full build into the output directory |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fatal Metadata
//!
//! A landing page without an author, a homepage, or an avatar is wrong, not
//! degraded. Missing values abort the build before the output directory is
//! touched. Optional values (tagline, bio, blog, social handles) that are
//! absent or blank are left out of the page entirely: no empty links.
//!
//! ## Fixed Avatar Size
//!
//! The avatar is always displayed at 50×50. The source is cropped to a
//! square at 1x and, when large enough, 2x, so high-density screens get a
//! sharp image without shipping the original.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error and all interpolation is escaped. The one deliberate
//! exception is the obfuscated mail destination, which is already encoded.

pub mod avatar;
pub mod cache;
pub mod compose;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod obfuscate;
pub mod output;
pub mod render;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
