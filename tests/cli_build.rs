//! End-to-end tests: run the built binary against a temp content directory.
//!
//! These use the real image backend, so the avatar is actually encoded to
//! AVIF. Sources are kept tiny to keep rav1e fast.

use image::{Rgb, RgbImage};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const CONFIG: &str = r#"
[site]
homepage = "https://example.com"
author = "Jane Doe"
tagline = "Software, mostly."
bio = "a software engineer at [Acme](https://acme.test)."

[site.avatar]
pattern = "images/me.png"

[social]
email = "jane@example.com"
github = "janedoe"
twitter = "janedoe"
"#;

fn setup_content(config: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), config).unwrap();
    let images = tmp.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    RgbImage::from_fn(120, 160, |x, y| Rgb([(x * 2) as u8, y as u8, 128]))
        .save(images.join("me.png"))
        .unwrap();
    tmp
}

fn run(args: &[&str], source: &Path, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simple-folio"))
        .args(args)
        .arg("--source")
        .arg(source)
        .arg("--output")
        .arg(output)
        .output()
        .expect("failed to run simple-folio")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

#[test]
fn build_produces_page_and_avatars() {
    let content = setup_content(CONFIG);
    let dist = TempDir::new().unwrap();

    let out = run(&["build"], content.path(), dist.path());
    assert!(
        out.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let html = std::fs::read_to_string(dist.path().join("index.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"<span class="middle-initial">e</span>"#));
    assert!(html.contains(r#"srcset="avatar-50.avif 1x, avatar-100.avif 2x""#));
    assert!(html.contains(r#"href="https://acme.test""#));
    assert!(!html.contains("jane@example.com"));

    for name in ["avatar-50.avif", "avatar-100.avif"] {
        let img = image::open(dist.path().join(name));
        // Decoding AVIF needs dav1d; size is enough when it's unavailable.
        if let Ok(img) = img {
            assert_eq!(img.width(), img.height());
        }
        assert!(dist.path().join(name).metadata().unwrap().len() > 0);
    }

    assert!(stdout(&out).contains("Cache: 0 cached, 2 encoded, 2 total"));
}

#[test]
fn second_build_is_cached() {
    let content = setup_content(CONFIG);
    let dist = TempDir::new().unwrap();

    assert!(run(&["build"], content.path(), dist.path()).status.success());
    let out = run(&["build"], content.path(), dist.path());
    assert!(out.status.success());
    assert!(stdout(&out).contains("Cache: 2 cached, 0 encoded, 2 total"));

    let out = run(&["build", "--no-cache"], content.path(), dist.path());
    assert!(stdout(&out).contains("Cache: 0 cached, 2 encoded, 2 total"));
}

#[test]
fn missing_author_fails_without_output() {
    let content = setup_content("[site]\nhomepage = \"https://example.com\"\n");
    let parent = TempDir::new().unwrap();
    let dist = parent.path().join("dist");

    let out = run(&["build"], content.path(), &dist);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("site.author"));
    assert!(!dist.exists());
}

#[test]
fn missing_avatar_fails_with_pattern() {
    let content = setup_content(CONFIG);
    std::fs::remove_file(content.path().join("images/me.png")).unwrap();
    let dist = TempDir::new().unwrap();

    let out = run(&["check"], content.path(), dist.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("images/me.png"));
}

#[test]
fn check_reports_metadata() {
    let content = setup_content(CONFIG);
    let dist = TempDir::new().unwrap();

    let out = run(&["check"], content.path(), dist.path());
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Author: Jane Doe"));
    assert!(text.contains("Source: images/me.png (120x160)"));
    assert!(text.contains("==> Content is valid"));
    assert!(!dist.path().join("index.html").exists());
}

#[test]
fn tree_prints_json() {
    let content = setup_content(CONFIG);
    let dist = TempDir::new().unwrap();

    let out = run(&["tree"], content.path(), dist.path());
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["node"], "container");
    assert_eq!(json["role"], "page");
}

#[test]
fn gen_config_parses() {
    let tmp = TempDir::new().unwrap();
    let out = run(&["gen-config"], tmp.path(), tmp.path());
    assert!(out.status.success());
    let value: toml::Value = toml::from_str(&stdout(&out)).unwrap();
    assert!(value.get("site").is_some());
}
