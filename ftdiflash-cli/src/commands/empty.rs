//! Empty command: check whether the memory reads as erased.

use anyhow::{Context, Result};
use console::style;

use crate::Cli;
use crate::commands::{render, transfer_bar};

pub(crate) fn cmd_empty(cli: &Cli) -> Result<()> {
    let mut flash = crate::open_flash(cli)?;

    let pb = transfer_bar(cli.quiet);
    let empty = flash
        .is_empty(|event| render(&pb, event))
        .context("could not read memory contents")?;
    pb.finish_and_clear();

    if empty {
        println!("{} Memory is empty (all 0xFF)", style("OK").green());
    } else {
        println!("{} Memory is not empty", style("!!").yellow());
    }
    Ok(())
}
