//! List command: enumerate FTDI channels.

use anyhow::{Context, Result};
use console::style;
use ftdiflash::bridge::mpsse;

pub(crate) fn cmd_list(json: bool) -> Result<()> {
    let channels = mpsse::list_channels().context("could not enumerate FTDI channels")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
        return Ok(());
    }

    if channels.is_empty() {
        eprintln!("{} No FTDI channels found", style("!!").yellow());
        return Ok(());
    }

    for ch in &channels {
        println!("Channel {}:", ch.index);
        println!("  Description:  {}", ch.description);
        println!("  Serial:       {}", ch.serial_number);
        println!("  Type:         {}", ch.device_type);
        println!(
            "  USB ID:       {:04x}:{:04x}",
            ch.vendor_id, ch.product_id
        );
    }
    Ok(())
}
