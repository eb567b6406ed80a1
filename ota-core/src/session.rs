/// Transport session contract: one connection, one streamed image
use crate::config::UpdateConfig;
use crate::descriptor::FirmwareDescriptor;
use crate::error::SessionError;

/// Result of a successful download step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// More data is expected; call `step` again
    InProgress,
    /// The transfer ended without a transport error
    Done,
}

/// Opens sessions against the update server
pub trait Transport {
    type Session: TransportSession;

    /// Connect using the configured URL, receive timeout and keep-alive.
    /// May block on the network up to the receive timeout.
    fn begin(&mut self, config: &UpdateConfig) -> Result<Self::Session, SessionError>;
}

/// A single in-progress download into the next-update partition.
///
/// `finish` and `abort` consume the session, so it is always released before
/// the task reaches its terminal action.
pub trait TransportSession {
    /// Read just enough of the image to extract its descriptor
    fn fetch_descriptor(&mut self) -> Result<FirmwareDescriptor, SessionError>;

    /// Download one chunk and write it to flash. Blocks until data arrives or
    /// the receive timeout elapses.
    fn step(&mut self) -> Result<StepStatus, SessionError>;

    /// Bytes received so far; never decreases
    fn bytes_read(&self) -> usize;

    /// Full image size when the server announced it
    fn image_size(&self) -> Option<usize> {
        None
    }

    /// True only when the whole expected image has been received
    fn is_complete(&self) -> bool;

    /// Finalize the write and validate the image.
    ///
    /// `SessionError::ValidateFailed` means the bytes are on flash but failed
    /// the integrity check; the storage layer marks the slot unbootable.
    fn finish(self) -> Result<(), SessionError>;

    /// Release everything tied to the session
    fn abort(self);
}

/// Download progress snapshot for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub bytes_read: usize,
    pub total: Option<usize>,
}

impl Progress {
    pub fn of<S: TransportSession + ?Sized>(session: &S) -> Self {
        Self {
            bytes_read: session.bytes_read(),
            total: session.image_size(),
        }
    }

    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some(((self.bytes_read.min(total) * 100) / total) as u8),
        }
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.total, self.percent()) {
            (Some(total), Some(pct)) => {
                write!(f, "{}/{} bytes ({}%)", self.bytes_read, total, pct)
            }
            _ => write!(f, "{} bytes", self.bytes_read),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_needs_a_known_size() {
        let p = Progress {
            bytes_read: 512,
            total: None,
        };
        assert_eq!(p.percent(), None);
        assert_eq!(p.to_string(), "512 bytes");
    }

    #[test]
    fn percent_is_clamped() {
        let p = Progress {
            bytes_read: 3000,
            total: Some(2000),
        };
        assert_eq!(p.percent(), Some(100));
    }

    #[test]
    fn display_with_total() {
        let p = Progress {
            bytes_read: 256,
            total: Some(1024),
        };
        assert_eq!(p.to_string(), "256/1024 bytes (25%)");
    }

    #[test]
    fn zero_total_has_no_percent() {
        let p = Progress {
            bytes_read: 0,
            total: Some(0),
        };
        assert_eq!(p.percent(), None);
    }
}
