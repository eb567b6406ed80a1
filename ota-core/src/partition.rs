/// Read-only view of the flash regions the update task cares about
use crate::descriptor::FirmwareDescriptor;
use crate::error::{OtaError, Precondition};

/// A labeled flash region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub label: String,
    pub address: u32,
    pub size: u32,
}

impl Partition {
    pub fn new(label: &str, address: u32, size: u32) -> Self {
        Self {
            label: label.to_string(),
            address,
            size,
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" (0x{:08x})", self.label, self.address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionRole {
    Boot,
    Running,
    NextUpdate,
    LastInvalid,
}

impl std::fmt::Display for PartitionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionRole::Boot => write!(f, "boot"),
            PartitionRole::Running => write!(f, "running"),
            PartitionRole::NextUpdate => write!(f, "next-update"),
            PartitionRole::LastInvalid => write!(f, "last-invalid"),
        }
    }
}

/// Storage layer queries. Implementations must not cache across restarts.
pub trait PartitionManager {
    fn boot_partition(&self) -> Option<Partition>;
    fn running_partition(&self) -> Option<Partition>;
    fn next_update_partition(&self) -> Option<Partition>;
    fn last_invalid_partition(&self) -> Option<Partition>;

    /// Descriptor recorded for `partition`, or `DescriptorUnavailable`
    fn descriptor_of(&self, partition: &Partition) -> Result<FirmwareDescriptor, OtaError>;
}

/// Partitions read once at the start of an invocation
#[derive(Debug, Clone)]
pub struct PartitionSet {
    pub boot: Option<Partition>,
    pub running: Partition,
    pub next_update: Partition,
    pub last_invalid: Option<Partition>,
}

impl PartitionSet {
    /// Read all four roles and check the layout the download depends on.
    ///
    /// A boot/running mismatch is only logged: it means the boot selection data
    /// or the preferred image got corrupted, and the update can still proceed.
    pub fn read<P: PartitionManager + ?Sized>(manager: &P) -> Result<Self, Precondition> {
        let boot = manager.boot_partition();
        let running = manager
            .running_partition()
            .ok_or(Precondition::MissingPartition(PartitionRole::Running))?;
        let next_update = manager
            .next_update_partition()
            .ok_or(Precondition::MissingPartition(PartitionRole::NextUpdate))?;
        let last_invalid = manager.last_invalid_partition();

        match &boot {
            Some(boot) if *boot != running => {
                log::warn!(
                    "Configured OTA boot partition at offset 0x{:08x}, but running from offset 0x{:08x}",
                    boot.address,
                    running.address
                );
            }
            None => log::warn!("No OTA boot partition configured"),
            _ => {}
        }

        if next_update == running {
            return Err(Precondition::UpdateIsRunning);
        }

        Ok(Self {
            boot,
            running,
            next_update,
            last_invalid,
        })
    }
}

/// Render a partition SHA-256 digest as lowercase hex
pub fn hex_digest(digest: &[u8; 32]) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
