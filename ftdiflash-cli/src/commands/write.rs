//! Write command: erase, program, and verify a raw image.

use anyhow::{Context, Result, bail};
use console::style;
use ftdiflash::Verify;
use std::path::Path;

use crate::Cli;
use crate::commands::{render, transfer_bar};

pub(crate) fn cmd_write(cli: &Cli, file: &Path, no_verify: bool) -> Result<()> {
    let image = std::fs::read(file)
        .with_context(|| format!("could not read image file {}", file.display()))?;

    if !cli.quiet {
        eprintln!(
            "{} Image: {} ({} bytes)",
            style("->").cyan(),
            file.display(),
            image.len()
        );
    }

    // Reject oversized images before touching any hardware.
    let capacity = ftdiflash::DeviceParams::default().capacity;
    if image.len() > capacity {
        bail!(
            "image is {} bytes but the device capacity is {capacity} bytes",
            image.len()
        );
    }

    let mut flash = open_and_report(cli)?;

    let pb = transfer_bar(cli.quiet);
    let outcome = run_program(&mut flash, &image, no_verify, &pb);
    pb.finish_and_clear();
    let verdict = outcome.context("programming failed")?;

    if no_verify {
        if !cli.quiet {
            eprintln!("{} Programming complete (verification skipped)", style("OK").green());
        }
        return Ok(());
    }

    match verdict {
        Verify::Success => {
            println!("{}", style("SUCCESS").green().bold());
            Ok(())
        },
        Verify::Mismatch => {
            println!("{}", style("FAILURE").red().bold());
            bail!("verification failed: read-back does not match the image")
        },
    }
}

fn run_program(
    flash: &mut ftdiflash::Flash<ftdiflash::bridge::mpsse::MpsseBridge>,
    image: &[u8],
    no_verify: bool,
    pb: &indicatif::ProgressBar,
) -> ftdiflash::Result<Verify> {
    if no_verify {
        flash.bulk_erase(|event| render(pb, event))?;
        flash.write_all(image, |event| render(pb, event))?;
        Ok(Verify::Success)
    } else {
        flash.program_and_verify(image, |event| render(pb, event))
    }
}

fn open_and_report(cli: &Cli) -> Result<ftdiflash::Flash<ftdiflash::bridge::mpsse::MpsseBridge>> {
    let mut flash = crate::open_flash(cli)?;

    if !cli.quiet {
        let id = flash.read_id().context("could not read JEDEC ID")?;
        let status = flash.read_status().context("could not read status")?;
        let id_hex: Vec<String> = id.iter().map(|b| format!("{b:02X}")).collect();
        eprintln!("{} Memory ID: {}", style("->").cyan(), id_hex.join(" "));
        eprintln!(
            "{} Memory status: {:#04x}",
            style("->").cyan(),
            status.bits()
        );
    }

    Ok(flash)
}
