//! Read command: dump flash contents to a file.

use anyhow::{Context, Result, bail};
use console::style;
use std::path::Path;

use crate::Cli;
use crate::commands::{render, transfer_bar};

pub(crate) fn cmd_read(cli: &Cli, file: &Path, length: Option<usize>) -> Result<()> {
    let mut flash = crate::open_flash(cli)?;

    let capacity = flash.params().capacity;
    let length = length.unwrap_or(capacity);
    if length > capacity {
        bail!("requested {length} bytes but the device capacity is {capacity} bytes");
    }

    let pb = transfer_bar(cli.quiet);
    let contents = flash
        .read_all(length, |event| render(&pb, event))
        .context("read failed")?;
    pb.finish_and_clear();

    std::fs::write(file, &contents)
        .with_context(|| format!("could not write output file {}", file.display()))?;

    if !cli.quiet {
        eprintln!(
            "{} Read {} bytes into {}",
            style("OK").green(),
            contents.len(),
            file.display()
        );
    }
    Ok(())
}
