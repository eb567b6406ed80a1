//! Task lifecycle guard
//!
//! The host scheduler requires the update task to never return. Every outcome
//! ends in one of two diverging host actions.

use log::{error, info};

use crate::controller::{Outcome, UpdateController};
use crate::partition::PartitionManager;
use crate::session::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    RestartDevice,
    Terminate,
}

impl Outcome {
    /// `ValidateFailed` restarts too: the storage layer has already marked the
    /// slot unbootable, so the next boot stays on the current image.
    pub fn terminal_action(&self) -> TerminalAction {
        match self {
            Outcome::Downloaded | Outcome::ValidateFailed => TerminalAction::RestartDevice,
            _ => TerminalAction::Terminate,
        }
    }
}

/// Services the host runtime provides to the update task
pub trait TaskHost {
    /// Let other tasks run between download steps
    fn yield_now(&mut self) {}

    fn restart(&mut self) -> !;

    /// Delete the calling task
    fn terminate(&mut self) -> !;
}

/// Run one update attempt and hand control back only through `host`
pub fn run_update_task<P, T, H>(mut controller: UpdateController<P, T>, host: &mut H) -> !
where
    P: PartitionManager,
    T: Transport,
    H: TaskHost,
{
    let outcome = controller.run_yielding(|| host.yield_now());
    finish_task(&outcome, host)
}

/// Perform the terminal action for `outcome`
pub fn finish_task<H: TaskHost>(outcome: &Outcome, host: &mut H) -> ! {
    match outcome.terminal_action() {
        TerminalAction::RestartDevice => {
            if *outcome == Outcome::ValidateFailed {
                error!("Restarting after validation failure; bad image is not bootable");
            }
            info!("Prepare to restart system!");
            host.restart()
        }
        TerminalAction::Terminate => {
            info!("Exiting task .. ({:?})", outcome);
            host.terminate()
        }
    }
}
