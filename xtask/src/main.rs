//! Build automation for open-hackathon
//!
//! Usage: cargo run -p xtask -- <command>
//!
//! Available commands:
//! - build: Build the project
//! - test: Run unit and integration tests
//! - dist: Package the release binary
//! - ci: Run format, clippy and test checks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BIN: &str = "open-hackathon";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for open-hackathon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Run only the tests/ suites
        #[arg(long)]
        integration: bool,
        /// Also run tests that need a live Kubernetes cluster
        #[arg(long)]
        live: bool,
    },
    /// Package the release binary as a tarball
    Dist {
        /// Target triple (e.g., x86_64-unknown-linux-gnu)
        #[arg(long)]
        target: Option<String>,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Format code
    Format {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root());

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { integration, live } => test(&sh, integration, live),
        Commands::Dist { target } => dist(&sh, target),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building {}...", BIN);

    let profile: &[&str] = if release { &["--release"] } else { &[] };
    cmd!(sh, "cargo build -p {BIN} {profile...}").run()?;

    let dir = if release { "release" } else { "debug" };
    println!("✅ Build completed: target/{}/{}", dir, BIN);
    Ok(())
}

fn test(sh: &Shell, integration: bool, live: bool) -> Result<()> {
    println!("🧪 Running tests...");

    let suites: &[&str] = if integration {
        &["--test", "adapter_test", "--test", "template_test", "--test", "web_test"]
    } else {
        &[]
    };
    let ignored: &[&str] = if live { &["--include-ignored"] } else { &[] };

    cmd!(sh, "cargo test -p {BIN} {suites...} -- {ignored...}").run()?;

    println!("✅ All tests passed");
    Ok(())
}

fn dist(sh: &Shell, target: Option<String>) -> Result<()> {
    println!("📦 Creating distribution package...");

    let (target_args, binary_src) = match &target {
        Some(triple) => (
            vec!["--target".to_string(), triple.clone()],
            project_root().join(format!("target/{}/release/{}", triple, BIN)),
        ),
        None => (Vec::new(), project_root().join(format!("target/release/{}", BIN))),
    };
    cmd!(sh, "cargo build -p {BIN} --release {target_args...}").run()?;

    let dist_dir = project_root().join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(&binary_src, dist_dir.join(BIN))?;

    let version = env!("CARGO_PKG_VERSION");
    let archive_name = match &target {
        Some(triple) => format!("{}-{}-{}.tar.gz", BIN, version, triple),
        None => format!("{}-{}.tar.gz", BIN, version),
    };

    cmd!(sh, "tar -czf {archive_name} -C dist {BIN}")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false, false)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .to_path_buf()
}
