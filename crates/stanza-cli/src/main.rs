mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stanza", about = "Scaffold Dockerfiles for Node.js web apps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a stanza.toml for the Node.js project in the current directory
    Init {
        /// Overwrite an existing stanza.toml
        #[arg(long)]
        force: bool,
    },
    /// Render the Dockerfile from stanza.toml and flags
    Generate(GenerateArgs),
    /// Validate stanza.toml without writing anything
    Check,
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Base image, e.g. node:18-alpine
    #[arg(long)]
    base_image: Option<String>,
    /// Working directory inside the container
    #[arg(long)]
    work_dir: Option<String>,
    /// File copied before installing (repeatable)
    #[arg(long = "manifest")]
    manifest_files: Vec<String>,
    /// Dependency install command, e.g. "npm ci"
    #[arg(long)]
    install: Option<String>,
    /// Source path copied into the image
    #[arg(long)]
    source: Option<String>,
    /// Destination of the source copy
    #[arg(long)]
    dest: Option<String>,
    /// Port the application listens on
    #[arg(long, short = 'p')]
    port: Option<u32>,
    /// Startup command, e.g. "npm start"
    #[arg(long)]
    start: Option<String>,
    /// Directory to write the Dockerfile into
    #[arg(long, short = 'o', default_value = ".")]
    output: PathBuf,
    /// Print the Dockerfile instead of writing it
    #[arg(long)]
    stdout: bool,
    /// Overwrite an existing Dockerfile
    #[arg(long)]
    force: bool,
    /// Do not write a .dockerignore
    #[arg(long)]
    no_ignore: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init_project(force)?,
        Commands::Generate(args) => commands::generate(&args)?,
        Commands::Check => commands::check()?,
    }

    Ok(())
}
