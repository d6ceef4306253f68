//! Create a fresh patch file.

use anyhow::{Context, bail};
use clap::Args;
use pianoroll_config::PatchFile;
use pianoroll_registry::ModelRegistry;
use std::path::PathBuf;

use super::common::PIANO_ROLL;

#[derive(Args)]
pub struct NewArgs {
    /// Patch file to write
    file: PathBuf,

    /// Model slug
    #[arg(long, default_value = PIANO_ROLL)]
    model: String,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: NewArgs) -> anyhow::Result<()> {
    if args.file.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.file.display()
        );
    }

    let registry = ModelRegistry::new();
    let patch = PatchFile::fresh(&registry, &args.model)?;
    patch
        .save(&args.file)
        .with_context(|| format!("failed to write {}", args.file.display()))?;

    println!("Created {} patch: {}", args.model, args.file.display());
    Ok(())
}
