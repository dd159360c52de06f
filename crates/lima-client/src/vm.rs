//! VM records as reported by `limactl list`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a VM.
///
/// Lima reports status as a free-form string; the variants cover the
/// states the dashboard acts on, and anything else round-trips
/// through [`VmStatus::Other`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VmStatus {
    /// Instance is up; connect/stop/restart are valid.
    Running,
    /// Instance is down; start is valid.
    Stopped,
    /// Transitional, no lifecycle action valid.
    Starting,
    /// Transitional, no lifecycle action valid.
    Stopping,
    /// Any status string this crate does not recognize.
    Other(String),
}

impl From<String> for VmStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Running" => Self::Running,
            "Stopped" => Self::Stopped,
            "Starting" => Self::Starting,
            "Stopping" => Self::Stopping,
            _ => Self::Other(s),
        }
    }
}

impl From<VmStatus> for String {
    fn from(status: VmStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Starting => write!(f, "Starting"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Default for VmStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// Point-in-time attributes of one VM, parsed from a single line of
/// `limactl list --format json` output.
///
/// Records are immutable snapshots: each inventory reload replaces
/// the whole list, nothing is mutated field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmRecord {
    /// Instance name, unique per host.
    pub name: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: VmStatus,
    /// Host address the SSH forward listens on.
    #[serde(default)]
    pub ssh_address: String,
    /// Local port of the SSH forward.
    #[serde(default)]
    pub ssh_local_port: u16,
    /// Backend driver, e.g. `vz` or `qemu`.
    #[serde(default)]
    pub vm_type: String,
    /// Guest architecture.
    #[serde(default)]
    pub arch: String,
    /// Virtual CPU count.
    #[serde(default)]
    pub cpus: u32,
    /// Memory size in bytes.
    #[serde(default)]
    pub memory: u64,
    /// Disk size in bytes.
    #[serde(default)]
    pub disk: u64,
    /// Instance directory on the host.
    #[serde(default)]
    pub dir: String,
}

impl VmRecord {
    /// SSH endpoint for display: `host:port`, or just the port when
    /// Lima only forwards on loopback.
    pub fn address(&self) -> String {
        if self.ssh_address.is_empty() || self.ssh_address == "127.0.0.1" {
            self.ssh_local_port.to_string()
        } else {
            format!("{}:{}", self.ssh_address, self.ssh_local_port)
        }
    }
}

/// Render a byte count the way the dashboard shows it: whole
/// gibibytes at or above 1 GiB, whole mebibytes below.
pub fn format_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    let bytes = bytes as f64;
    if bytes < GIB {
        format!("{:.0}M", bytes / MIB)
    } else {
        format!("{:.0}G", bytes / GIB)
    }
}

/// Replace a leading home-directory prefix with `~`.
///
/// Only a whole path component counts as a prefix: `/home/user2` is
/// not abbreviated for home `/home/user`.
pub fn abbreviate_home(dir: &str, home: &str) -> String {
    if home.is_empty() {
        return dir.to_string();
    }
    if dir == home {
        return "~".to_string();
    }
    match dir.strip_prefix(home) {
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => dir.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sample_line() -> &'static str {
        r#"{"name":"default","status":"Running","dir":"/Users/dev/.lima/default","arch":"aarch64","cpus":4,"memory":4294967296,"disk":107374182400,"sshLocalPort":60022,"sshAddress":"127.0.0.1","vmType":"vz"}"#
    }

    #[test]
    fn record_parses_limactl_line() {
        let vm: VmRecord = serde_json::from_str(sample_line()).expect("should parse");
        assert_eq!(vm.name, "default");
        assert_eq!(vm.status, VmStatus::Running);
        assert_eq!(vm.cpus, 4);
        assert_eq!(vm.memory, 4 * 1024 * 1024 * 1024);
        assert_eq!(vm.ssh_local_port, 60022);
        assert_eq!(vm.vm_type, "vz");
    }

    #[test]
    fn missing_optional_fields_default() {
        let vm: VmRecord =
            serde_json::from_str(r#"{"name":"bare","status":"Stopped"}"#).expect("should parse");
        assert_eq!(vm.name, "bare");
        assert_eq!(vm.status, VmStatus::Stopped);
        assert_eq!(vm.cpus, 0);
        assert!(vm.dir.is_empty());
    }

    #[test_case("Running", VmStatus::Running)]
    #[test_case("Stopped", VmStatus::Stopped)]
    #[test_case("Starting", VmStatus::Starting)]
    #[test_case("Stopping", VmStatus::Stopping)]
    fn status_from_known_string(s: &str, expected: VmStatus) {
        assert_eq!(VmStatus::from(s.to_string()), expected);
    }

    #[test]
    fn status_preserves_unknown_string() {
        let status = VmStatus::from("Broken".to_string());
        assert_eq!(status, VmStatus::Other("Broken".to_string()));
        assert_eq!(status.to_string(), "Broken");
    }

    #[test]
    fn address_hides_loopback_host() {
        let mut vm: VmRecord = serde_json::from_str(sample_line()).expect("should parse");
        assert_eq!(vm.address(), "60022");
        vm.ssh_address = "192.168.5.15".into();
        assert_eq!(vm.address(), "192.168.5.15:60022");
        vm.ssh_address.clear();
        assert_eq!(vm.address(), "60022");
    }

    #[test_case(512 * 1024 * 1024, "512M")]
    #[test_case(1024 * 1024 * 1024, "1G")]
    #[test_case(4 * 1024 * 1024 * 1024, "4G")]
    #[test_case(100 * 1024 * 1024 * 1024, "100G")]
    fn format_size_rounds_to_whole_units(bytes: u64, expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }

    #[test]
    fn abbreviate_home_replaces_prefix() {
        assert_eq!(
            abbreviate_home("/Users/dev/.lima/default", "/Users/dev"),
            "~/.lima/default"
        );
        assert_eq!(abbreviate_home("/Users/dev", "/Users/dev"), "~");
        assert_eq!(abbreviate_home("/Users/dev2/.lima", "/Users/dev"), "/Users/dev2/.lima");
        assert_eq!(abbreviate_home("/var/lib/lima", "/Users/dev"), "/var/lib/lima");
        assert_eq!(abbreviate_home("/var/lib/lima", ""), "/var/lib/lima");
    }
}
