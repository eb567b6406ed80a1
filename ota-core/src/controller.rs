//! Update controller: check, compare, download, validate
//!
//! One call to [`UpdateController::run`] is one update attempt. Nothing is
//! retried; a caller that wants periodic checks re-runs the whole controller.

use log::{debug, error, info, warn};

use crate::config::UpdateConfig;
use crate::descriptor::{self, FirmwareDescriptor};
use crate::error::{OtaError, Precondition, SessionError};
use crate::partition::{Partition, PartitionManager, PartitionSet};
use crate::session::{Progress, StepStatus, Transport, TransportSession};

/// How one invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Server image equals the running image
    NoUpdateAvailable,
    /// Server image equals the image last marked invalid
    MatchesInvalidVersion,
    /// Image written and validated
    Downloaded,
    /// Step error, incomplete transfer, or finalize error
    DownloadFailed(OtaError),
    /// Image written but failed validation
    ValidateFailed,
    /// Partition layout unusable; no session was opened
    FatalPrecondition(Precondition),
    /// Session could not be opened or the remote descriptor not read
    SessionFailed(OtaError),
}

/// Result of comparing the server descriptor against what is on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    RejectInvalid,
    Skip,
    Download,
}

/// Known-bad check first, then up-to-date check. Absent descriptors are never
/// compared.
pub fn decide(
    remote: &FirmwareDescriptor,
    running: Option<&FirmwareDescriptor>,
    last_invalid: Option<&FirmwareDescriptor>,
) -> Decision {
    if let Some(invalid) = last_invalid {
        if descriptor::equal(invalid, remote) {
            return Decision::RejectInvalid;
        }
    }
    if let Some(running) = running {
        if descriptor::equal(remote, running) {
            return Decision::Skip;
        }
    }
    Decision::Download
}

pub struct UpdateController<P, T> {
    config: UpdateConfig,
    partitions: P,
    transport: T,
}

impl<P, T> UpdateController<P, T>
where
    P: PartitionManager,
    T: Transport,
{
    pub fn new(config: UpdateConfig, partitions: P, transport: T) -> Self {
        Self {
            config,
            partitions,
            transport,
        }
    }

    pub fn run(&mut self) -> Outcome {
        self.run_yielding(|| {})
    }

    /// Run one attempt, calling `between_steps` after every chunk so the
    /// host scheduler gets a chance to run other tasks.
    pub fn run_yielding<F: FnMut()>(&mut self, mut between_steps: F) -> Outcome {
        info!("Checking for OTA update ({})", self.config.url);

        let parts = match PartitionSet::read(&self.partitions) {
            Ok(parts) => parts,
            Err(precondition) => {
                error!("Partition layout unusable: {}", precondition);
                return Outcome::FatalPrecondition(precondition);
            }
        };
        info!("Running from part {}", parts.running);

        let mut session = match self.transport.begin(&self.config) {
            Ok(session) => session,
            Err(SessionError::NoSessionHandle) => {
                error!("No update found");
                return Outcome::SessionFailed(OtaError::NoSessionHandle);
            }
            Err(e) => {
                error!("Begin failed: {}", e);
                return Outcome::SessionFailed(e.into());
            }
        };

        let remote = match session.fetch_descriptor() {
            Ok(desc) => desc,
            Err(e) => {
                error!("Can't get server version: {}", e);
                let outcome = Outcome::SessionFailed(OtaError::DescriptorFetch(e.to_string()));
                return abandon(session, outcome);
            }
        };
        info!("Firmware on server: {}", remote);

        let running = self.load_descriptor(&parts.running);
        if let Some(desc) = &running {
            info!("Firmware running:   {}", desc);
        }
        let invalid = parts
            .last_invalid
            .as_ref()
            .and_then(|part| self.load_descriptor(part));
        if let Some(desc) = &invalid {
            info!("Firmware marked invalid: {}", desc);
        }

        match decide(&remote, running.as_ref(), invalid.as_ref()) {
            Decision::RejectInvalid => {
                warn!(
                    "Version on server is the same as invalid version ({})",
                    remote.version_str()
                );
                return abandon(session, Outcome::MatchesInvalidVersion);
            }
            Decision::Skip => {
                info!("No update available");
                return abandon(session, Outcome::NoUpdateAvailable);
            }
            Decision::Download => {}
        }

        warn!("Downloading OTA update ..");
        info!("Writing to part {}", parts.next_update);

        let last = loop {
            match session.step() {
                Ok(StepStatus::InProgress) => {
                    info!("Bytes read: {}", Progress::of(&session));
                    between_steps();
                }
                other => break other,
            }
        };

        if let Err(e) = last {
            error!("Download error ({})", e);
            let outcome = Outcome::DownloadFailed(OtaError::DownloadFailed(e.to_string()));
            return abandon(session, outcome);
        }
        if !session.is_complete() {
            error!(
                "Download error (incomplete image, {} read)",
                Progress::of(&session)
            );
            return abandon(
                session,
                Outcome::DownloadFailed(OtaError::DownloadFailed("incomplete image".into())),
            );
        }

        // finish releases the session on every result, no abort afterwards
        match session.finish() {
            Ok(()) => {
                info!("Image written to part {}", parts.next_update);
                Outcome::Downloaded
            }
            Err(SessionError::ValidateFailed) => {
                error!("Downloaded image is corrupted");
                Outcome::ValidateFailed
            }
            Err(e) => {
                error!("Finalizing image failed ({})", e);
                Outcome::DownloadFailed(e.into())
            }
        }
    }

    fn load_descriptor(&self, part: &Partition) -> Option<FirmwareDescriptor> {
        match self.partitions.descriptor_of(part) {
            Ok(desc) => Some(desc),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }
}

fn abandon<S: TransportSession>(session: S, outcome: Outcome) -> Outcome {
    session.abort();
    if !matches!(
        outcome,
        Outcome::NoUpdateAvailable | Outcome::MatchesInvalidVersion
    ) {
        error!("upgrade failed");
    }
    outcome
}
