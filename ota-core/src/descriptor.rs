/// Firmware identity metadata and the strict version comparison
///
/// Field capacities follow the ESP-IDF application descriptor layout.
use crate::error::DescriptorError;

pub const PROJECT_NAME_LEN: usize = 32;
pub const VERSION_LEN: usize = 32;
pub const DATE_LEN: usize = 16;
pub const TIME_LEN: usize = 16;

/// Identity of a firmware image: four fixed-capacity, NUL-padded text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirmwareDescriptor {
    pub project_name: [u8; PROJECT_NAME_LEN],
    pub version: [u8; VERSION_LEN],
    pub date: [u8; DATE_LEN],
    pub time: [u8; TIME_LEN],
}

impl FirmwareDescriptor {
    /// Build a descriptor from text; unused capacity is zero-filled
    pub fn new(
        project_name: &str,
        version: &str,
        date: &str,
        time: &str,
    ) -> Result<Self, DescriptorError> {
        Ok(Self {
            project_name: pack("project_name", project_name)?,
            version: pack("version", version)?,
            date: pack("date", date)?,
            time: pack("time", time)?,
        })
    }

    /// Wrap raw fields exactly as the storage layer recorded them
    pub fn from_raw(
        project_name: [u8; PROJECT_NAME_LEN],
        version: [u8; VERSION_LEN],
        date: [u8; DATE_LEN],
        time: [u8; TIME_LEN],
    ) -> Self {
        Self {
            project_name,
            version,
            date,
            time,
        }
    }

    pub fn project_name_str(&self) -> &str {
        trimmed(&self.project_name)
    }

    pub fn version_str(&self) -> &str {
        trimmed(&self.version)
    }

    pub fn date_str(&self) -> &str {
        trimmed(&self.date)
    }

    pub fn time_str(&self) -> &str {
        trimmed(&self.time)
    }
}

impl std::fmt::Display for FirmwareDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} ({} {})",
            self.project_name_str(),
            self.version_str(),
            self.date_str(),
            self.time_str()
        )
    }
}

/// True iff all four fields match over their full declared capacity.
///
/// Bytes after the first NUL take part in the comparison, so two fields that
/// read the same as strings but differ in their padding are not equal.
pub fn equal(a: &FirmwareDescriptor, b: &FirmwareDescriptor) -> bool {
    a.project_name == b.project_name
        && a.version == b.version
        && a.date == b.date
        && a.time == b.time
}

fn pack<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N], DescriptorError> {
    let bytes = value.as_bytes();
    if bytes.len() > N {
        return Err(DescriptorError::FieldTooLong {
            field,
            len: bytes.len(),
            capacity: N,
        });
    }
    let mut out = [0u8; N];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

// Display only; never used for comparison
fn trimmed(field: &[u8]) -> &str {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    match std::str::from_utf8(&field[..end]) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&field[..e.valid_up_to()]).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fw(version: &str) -> FirmwareDescriptor {
        FirmwareDescriptor::new("fw", version, "2024-01-01", "00:00").unwrap()
    }

    #[test]
    fn identical_descriptors_match() {
        assert!(equal(&fw("1.0"), &fw("1.0")));
    }

    #[test]
    fn version_difference_is_detected() {
        assert!(!equal(&fw("1.0"), &fw("2.0")));
    }

    #[test]
    fn prefix_is_not_a_match() {
        assert!(!equal(&fw("1.0"), &fw("1.0.1")));
    }

    #[test]
    fn trailing_padding_takes_part_in_comparison() {
        let a = fw("1.0");
        let mut b = a;
        b.version[VERSION_LEN - 1] = b'x';
        assert_eq!(a.version_str(), b.version_str());
        assert!(!equal(&a, &b));
    }

    #[test]
    fn empty_descriptors_are_not_wildcards() {
        let empty = FirmwareDescriptor::new("", "", "", "").unwrap();
        assert!(!equal(&empty, &fw("1.0")));
        assert!(equal(&empty, &empty));
    }

    #[test]
    fn oversized_field_is_rejected() {
        let long = "x".repeat(DATE_LEN + 1);
        let err = FirmwareDescriptor::new("fw", "1.0", &long, "00:00").unwrap_err();
        assert_eq!(
            err,
            DescriptorError::FieldTooLong {
                field: "date",
                len: DATE_LEN + 1,
                capacity: DATE_LEN
            }
        );
    }

    #[test]
    fn field_filling_full_capacity_is_accepted() {
        let name = "p".repeat(PROJECT_NAME_LEN);
        let d = FirmwareDescriptor::new(&name, "1.0", "d", "t").unwrap();
        assert_eq!(d.project_name_str(), name);
    }

    #[test]
    fn display_trims_padding() {
        assert_eq!(fw("2.0").to_string(), "fw.2.0 (2024-01-01 00:00)");
    }
}
