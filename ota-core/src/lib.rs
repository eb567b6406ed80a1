//! OTA Core - Hardware-independent firmware self-update logic
//!
//! This crate contains the check/compare/download/validate/restart state
//! machine. The storage layer, the update transport and the host task runtime
//! are reached through the [`PartitionManager`], [`Transport`] and
//! [`TaskHost`] traits, so everything here can be tested on the host.

pub mod config;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod partition;
pub mod schedule;
pub mod session;

pub use config::UpdateConfig;
pub use controller::{decide, Decision, Outcome, UpdateController};
pub use descriptor::FirmwareDescriptor;
pub use error::{ConfigError, DescriptorError, OtaError, Precondition, SessionError};
pub use lifecycle::{finish_task, run_update_task, TaskHost, TerminalAction};
pub use partition::{hex_digest, Partition, PartitionManager, PartitionRole, PartitionSet};
pub use schedule::CheckSchedule;
pub use session::{Progress, StepStatus, Transport, TransportSession};
