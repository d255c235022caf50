//! Erase command: whole-chip bulk erase.

use anyhow::{Context, Result};
use console::style;

use crate::Cli;
use crate::commands::{erase_spinner, render};

pub(crate) fn cmd_erase(cli: &Cli) -> Result<()> {
    let mut flash = crate::open_flash(cli)?;

    // Once started the erase must run to completion; there is no cancel.
    let pb = erase_spinner(cli.quiet);
    flash
        .bulk_erase(|event| render(&pb, event))
        .context("bulk erase failed")?;
    pb.finish_and_clear();

    if !cli.quiet {
        eprintln!("{} Erase complete", style("OK").green());
    }
    Ok(())
}
