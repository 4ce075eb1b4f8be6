use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use goclens::cli;
use goclens::goc::{FileProfile, GocClient, ProfileSource};
use goclens::resolve::{PathResolver, ResolverConfig};

/// goclens — Go coverage profile ingestion and per-file coverage queries.
#[derive(Parser)]
#[command(name = "goclens", version, about)]
struct Cli {
    /// Workspace root (where go.mod lives).
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved profile and print per-file coverage.
    Report {
        /// Path to the profile file.
        profile: PathBuf,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a module path to a workspace file.
    Resolve {
        /// Module path, e.g. example.org/proj/sub/file.go
        module_path: String,
    },

    /// Fetch raw profile text from a goc aggregation server.
    Fetch {
        /// Aggregation server address, e.g. http://127.0.0.1:49598
        #[arg(long)]
        center: String,

        /// Write the raw profile here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Scan process output on stdin for the server announcement line.
    ServerUrl,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let output = match args.command {
        Commands::Report { profile, json } => {
            let raw = FileProfile { path: profile }
                .fetch_profile()
                .context("Failed to read profile")?;
            cli::cmd_report(&raw, json)?
        }
        Commands::Resolve { module_path } => {
            let resolver = PathResolver::new(ResolverConfig::new(&args.root));
            cli::cmd_resolve(&resolver, &module_path)
        }
        Commands::Fetch { center, out } => {
            let client = GocClient::new(center).with_workdir(&args.root);
            match cli::cmd_fetch(&client) {
                Ok(raw) => match out {
                    Some(path) => {
                        std::fs::write(&path, &raw).context("Failed to write profile")?;
                        format!("wrote {}\n", path.display())
                    }
                    None => raw,
                },
                // The empty state gets its own guidance, not a bare error.
                Err(err) if err.is_no_profiles() => format!("{err}\n"),
                Err(err) => return Err(err.into()),
            }
        }
        Commands::ServerUrl => {
            let input = std::io::read_to_string(std::io::stdin())
                .context("Failed to read stdin")?;
            cli::cmd_server_url(&input)
        }
    };

    print!("{output}");
    Ok(())
}
