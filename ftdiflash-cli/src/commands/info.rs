//! Info command: JEDEC ID and status register of the attached memory.

use anyhow::{Context, Result};
use console::style;

use crate::Cli;

pub(crate) fn cmd_info(cli: &Cli) -> Result<()> {
    let mut flash = crate::open_flash(cli)?;

    let id = flash.read_id().context("could not read JEDEC ID")?;
    let status = flash.read_status().context("could not read status")?;

    let id_hex: Vec<String> = id.iter().map(|b| format!("{b:02X}")).collect();
    println!("Memory ID:     {}", id_hex.join(" "));
    println!("Memory status: {:#04x}", status.bits());
    println!(
        "  Busy:               {}",
        styled_bool(status.busy())
    );
    println!(
        "  Write enable latch: {}",
        styled_bool(status.write_enabled())
    );
    println!("Capacity:      {} bytes", flash.params().capacity);
    println!("Page size:     {} bytes", flash.params().page_size);

    Ok(())
}

fn styled_bool(value: bool) -> console::StyledObject<&'static str> {
    if value {
        style("set").yellow()
    } else {
        style("clear").green()
    }
}
