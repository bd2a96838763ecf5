use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for skyflight")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy, tests, then the headless smoke run
    Check,
    /// cargo fmt --check on all crates
    Fmt,
    /// clippy on all targets with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the frame loop bench
    Bench,
    /// Drive the CLI through a short simulation and a scene dump
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            smoke()?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => cargo("bench", &["bench", "-p", "skyflight-render"])?,
        Commands::Smoke => smoke()?,
    }

    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("{step} failed ({status})");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn smoke() -> Result<()> {
    let cli = ["run", "-q", "-p", "skyflight-cli", "--"];
    let simulate = [
        "simulate", "--frames", "120", "--pointer", "0", "0", "--wrap-angles",
    ];
    cargo("simulate", &[&cli[..], &simulate[..]].concat())?;
    cargo("scene", &[&cli[..], &["scene", "--seed", "7"][..]].concat())
}
