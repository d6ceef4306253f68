//! Copy one pattern over another.

use anyhow::bail;
use clap::Args;
use std::path::PathBuf;

use super::common::{LoadedPatch, check_pattern};

#[derive(Args)]
pub struct CopyPatternArgs {
    /// Patch file
    file: PathBuf,

    /// Source pattern index
    #[arg(long)]
    from: usize,

    /// Destination pattern index (overwritten, geometry included)
    #[arg(long)]
    to: usize,
}

pub fn run(args: CopyPatternArgs) -> anyhow::Result<()> {
    let mut loaded = LoadedPatch::load(&args.file)?;
    let from = check_pattern(args.from)?;
    let to = check_pattern(args.to)?;

    let store = loaded.module.patterns_mut();
    store.copy_pattern(from);
    if !store.paste_pattern(to) {
        bail!("nothing to paste from pattern {from}");
    }

    println!("Copied pattern {from} to pattern {to}");
    loaded.save(&args.file)
}
