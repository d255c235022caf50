//! Command implementations.

pub(crate) mod completions;
pub(crate) mod empty;
pub(crate) mod erase;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod read;
pub(crate) mod write;

use ftdiflash::Progress;
use indicatif::{ProgressBar, ProgressStyle};

/// Percentage bar for whole-image transfers.
pub(crate) fn transfer_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(100);
    #[allow(clippy::unwrap_used)] // Static template string
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:>8} [{bar:40.cyan/blue}] {pos}%")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    pb
}

/// Spinner for the unbounded bulk-erase wait.
pub(crate) fn erase_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::unwrap_used)] // Static template string
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    pb.set_message("Erasing");
    pb
}

/// Route an engine progress event onto the right indicator.
pub(crate) fn render(pb: &ProgressBar, event: Progress) {
    match event {
        Progress::Erasing => {
            pb.set_message("Erasing");
            pb.tick();
        },
        Progress::Writing { percent } => {
            pb.set_message("Writing");
            pb.set_position(u64::from(percent));
        },
        Progress::Reading { percent } => {
            pb.set_message("Reading");
            pb.set_position(u64::from(percent));
        },
    }
}
