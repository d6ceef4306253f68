//! Piano Roll CLI - inspect, edit and render piano roll patch files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pianoroll")]
#[command(author, version, about = "Piano Roll sequencer patch tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered models
    Models(commands::models::ModelsArgs),

    /// Write a fresh patch file
    New(commands::new::NewArgs),

    /// Show transport state and pattern contents
    Inspect(commands::inspect::InspectArgs),

    /// Edit one step
    Edit(commands::edit::EditArgs),

    /// Change a pattern's measures, beats or divisions
    Geometry(commands::geometry::GeometryArgs),

    /// Copy one pattern over another
    CopyPattern(commands::copy_pattern::CopyPatternArgs),

    /// Play a patch offline against a generated clock
    Render(commands::render::RenderArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Models(args) => commands::models::run(args),
        Commands::New(args) => commands::new::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Edit(args) => commands::edit::run(args),
        Commands::Geometry(args) => commands::geometry::run(args),
        Commands::CopyPattern(args) => commands::copy_pattern::run(args),
        Commands::Render(args) => commands::render::run(args),
    }
}
