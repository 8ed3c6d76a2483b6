use clap::{Parser, Subcommand};
use simple_folio::imaging::RustBackend;
use simple_folio::{compose, config, generate, metadata, output};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Landing page generator for a single author")]
#[command(long_about = "\
Landing page generator for a single author

One config file and one picture become a one-page site: a banner with the
author's name, a short bio, an avatar, and links to the author's profiles.

Content structure:

  content/
  ├── config.toml          # homepage, author, bio, social handles, colors
  └── profile-pic.png      # Avatar (any depth; name set by site.avatar.pattern)

Output:

  dist/
  ├── index.html           # CSS inlined, no scripts
  ├── avatar-50.avif       # 1x avatar
  └── avatar-100.avif      # 2x avatar

Run 'simple-folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve metadata, derive the avatar, and write the page
    Build {
        /// Ignore the encoding cache and re-encode the avatar
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate the content directory without writing anything
    Check,
    /// Print the composed display tree as JSON
    Tree,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build { no_cache } => {
            println!("==> Building {}", cli.source.display());
            let report = generate::build(&cli.source, &cli.output, &RustBackend::new(), !no_cache)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let meta = metadata::resolve(&cli.source)?;
            output::print_check_output(&meta);
            println!("==> Content is valid");
        }
        Command::Tree => {
            let meta = metadata::resolve(&cli.source)?;
            let tree = compose::compose(&meta);
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
