//! Node configuration loading from TOML files
//!
//! Every field is defaulted to the values the pilot lane ships with, so an
//! empty file (or no file at all) yields a working configuration. The
//! `[telemetry]` section is the one exception: publishing is off unless the
//! section is present, because there is no sensible default endpoint.
//!
//! Section values are plain numbers and strings; the typed domain objects
//! (allow list, gate config, occupancy calibration) are built through the
//! accessor methods, which is where validation happens. A configuration
//! that fails any accessor is rejected at startup before the control loop
//! begins.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use boomgate_control::{AllowList, GateConfig, GateTimings, OccupancyMonitor};
use boomgate_core::constants::{
    DEFAULT_AUTHORIZED_CREDENTIAL, DEFAULT_CLOSE_DELAY_MS, DEFAULT_CLOSE_THRESHOLD_CM,
    DEFAULT_CLOSED_ANGLE_DEG, DEFAULT_CYCLE_PERIOD_MS, DEFAULT_FREE_THRESHOLDS,
    DEFAULT_OPEN_ANGLE_DEG, DEFAULT_OPEN_SETTLE_MS, MIN_CYCLE_PERIOD_MS, SPOT_COUNT,
};
use boomgate_core::{CredentialId, GateAngles};
use boomgate_telemetry::TelemetryClientConfig;

/// Gate timing and geometry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Distance at or under which a reading counts as a vehicle (cm).
    pub close_threshold_cm: f32,

    /// Settle window after opening, during which events are ignored (ms).
    pub open_settle_ms: u64,

    /// Clearance delay between vehicle detection and the close command (ms).
    pub close_delay_ms: u64,

    /// Servo angle for the closed position (degrees).
    pub closed_angle_deg: u8,

    /// Servo angle for the open position (degrees).
    pub open_angle_deg: u8,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            close_threshold_cm: DEFAULT_CLOSE_THRESHOLD_CM,
            open_settle_ms: DEFAULT_OPEN_SETTLE_MS,
            close_delay_ms: DEFAULT_CLOSE_DELAY_MS,
            closed_angle_deg: DEFAULT_CLOSED_ANGLE_DEG,
            open_angle_deg: DEFAULT_OPEN_ANGLE_DEG,
        }
    }
}

/// Access control settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessSection {
    /// Authorized credentials as 8-hex-digit strings.
    pub allowed: Vec<String>,
}

impl Default for AccessSection {
    fn default() -> Self {
        Self {
            allowed: vec![CredentialId::new(DEFAULT_AUTHORIZED_CREDENTIAL).to_hex()],
        }
    }
}

/// Occupancy sensor calibration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OccupancySection {
    /// Per-spot raw threshold; readings strictly below mean the spot is free.
    pub free_thresholds: [u16; SPOT_COUNT],
}

impl Default for OccupancySection {
    fn default() -> Self {
        Self {
            free_thresholds: DEFAULT_FREE_THRESHOLDS,
        }
    }
}

/// Control loop scheduling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CycleSection {
    /// Control cycle period (ms).
    pub period_ms: u64,
}

impl Default for CycleSection {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_CYCLE_PERIOD_MS,
        }
    }
}

/// Telemetry endpoint settings. Publishing is disabled when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySection {
    /// Collection endpoint address.
    pub server_addr: SocketAddr,

    /// Channel number counts are published to.
    #[serde(default = "default_telemetry_channel")]
    pub channel: u8,

    /// I/O timeout for connect and publish (ms).
    #[serde(default = "default_telemetry_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_telemetry_channel() -> u8 {
    1
}

fn default_telemetry_timeout_ms() -> u64 {
    3000
}

/// Complete lane node configuration.
///
/// # Example
///
/// ```
/// use boomgate_node::NodeConfig;
///
/// // An empty file is a valid configuration
/// let config: NodeConfig = toml::from_str("").unwrap();
/// assert_eq!(config.cycle.period_ms, 500);
/// assert!(config.telemetry.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub gate: GateSection,

    #[serde(default)]
    pub access: AccessSection,

    #[serde(default)]
    pub occupancy: OccupancySection,

    #[serde(default)]
    pub cycle: CycleSection,

    pub telemetry: Option<TelemetrySection>,
}

impl NodeConfig {
    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as a
    /// node configuration. Semantic validation happens later, in the typed
    /// accessors.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Build the validated gate controller configuration.
    pub fn gate_config(&self) -> anyhow::Result<GateConfig> {
        let timings = GateTimings {
            open_settle: Duration::from_millis(self.gate.open_settle_ms),
            close_delay: Duration::from_millis(self.gate.close_delay_ms),
        };
        GateConfig::new(self.gate.close_threshold_cm, timings).context("invalid [gate] section")
    }

    /// Build the validated servo angle mapping.
    pub fn gate_angles(&self) -> anyhow::Result<GateAngles> {
        GateAngles::new(self.gate.closed_angle_deg, self.gate.open_angle_deg)
            .context("invalid [gate] angles")
    }

    /// Parse and validate the credential allow list.
    pub fn allow_list(&self) -> anyhow::Result<AllowList> {
        let mut entries = Vec::with_capacity(self.access.allowed.len());
        for value in &self.access.allowed {
            let credential = value
                .parse::<CredentialId>()
                .with_context(|| format!("invalid credential {value:?} in [access] allowed"))?;
            entries.push(credential);
        }
        AllowList::new(entries).context("invalid [access] section")
    }

    /// Build the validated occupancy classifier.
    pub fn occupancy_monitor(&self) -> anyhow::Result<OccupancyMonitor> {
        OccupancyMonitor::new(self.occupancy.free_thresholds)
            .context("invalid [occupancy] section")
    }

    /// Validate and return the control cycle period.
    pub fn cycle_period(&self) -> anyhow::Result<Duration> {
        anyhow::ensure!(
            self.cycle.period_ms >= MIN_CYCLE_PERIOD_MS,
            "cycle period must be at least {MIN_CYCLE_PERIOD_MS} ms, got {}",
            self.cycle.period_ms
        );
        Ok(Duration::from_millis(self.cycle.period_ms))
    }

    /// Telemetry client configuration, if publishing is enabled.
    pub fn telemetry_client_config(&self) -> Option<TelemetryClientConfig> {
        self.telemetry.as_ref().map(|section| TelemetryClientConfig {
            server_addr: section.server_addr,
            channel: section.channel,
            timeout: Duration::from_millis(section.timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: NodeConfig = toml::from_str("").unwrap();

        assert_eq!(config.gate.close_threshold_cm, 12.0);
        assert_eq!(config.gate.open_settle_ms, 2000);
        assert_eq!(config.gate.close_delay_ms, 5000);
        assert_eq!(config.gate.closed_angle_deg, 90);
        assert_eq!(config.gate.open_angle_deg, 0);
        assert_eq!(config.access.allowed, vec!["030C4916".to_string()]);
        assert_eq!(config.occupancy.free_thresholds, [500, 270, 400]);
        assert_eq!(config.cycle.period_ms, 500);
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: NodeConfig = toml::from_str(
            r#"
            [gate]
            close_threshold_cm = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.gate.close_threshold_cm, 20.0);
        assert_eq!(config.gate.open_settle_ms, 2000);
        assert_eq!(config.cycle.period_ms, 500);
    }

    #[test]
    fn test_default_allow_list_authorizes_pilot_credential() {
        let config = NodeConfig::default();
        let allow_list = config.allow_list().unwrap();

        let pilot = CredentialId::new(DEFAULT_AUTHORIZED_CREDENTIAL);
        assert!(allow_list.is_authorized(&pilot));
    }

    #[test]
    fn test_full_configuration_parses() {
        let config: NodeConfig = toml::from_str(
            r#"
            [gate]
            close_threshold_cm = 15.0
            open_settle_ms = 1000
            close_delay_ms = 2500
            closed_angle_deg = 85
            open_angle_deg = 5

            [access]
            allowed = ["030C4916", "DEADBEEF"]

            [occupancy]
            free_thresholds = [400, 400, 400]

            [cycle]
            period_ms = 250

            [telemetry]
            server_addr = "10.0.0.5:7878"
            channel = 7
            timeout_ms = 1500
            "#,
        )
        .unwrap();

        let gate = config.gate_config().unwrap();
        assert_eq!(gate.close_threshold_cm(), 15.0);
        assert_eq!(gate.timings().open_settle, Duration::from_millis(1000));
        assert_eq!(gate.timings().close_delay, Duration::from_millis(2500));

        let angles = config.gate_angles().unwrap();
        assert_eq!(angles.closed_deg, 85);
        assert_eq!(angles.open_deg, 5);

        let allow_list = config.allow_list().unwrap();
        assert_eq!(allow_list.len(), 2);

        assert_eq!(config.cycle_period().unwrap(), Duration::from_millis(250));

        let telemetry = config.telemetry_client_config().unwrap();
        assert_eq!(telemetry.server_addr.port(), 7878);
        assert_eq!(telemetry.channel, 7);
        assert_eq!(telemetry.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_telemetry_defaults_within_section() {
        let config: NodeConfig = toml::from_str(
            r#"
            [telemetry]
            server_addr = "10.0.0.5:7878"
            "#,
        )
        .unwrap();

        let telemetry = config.telemetry_client_config().unwrap();
        assert_eq!(telemetry.channel, 1);
        assert_eq!(telemetry.timeout, Duration::from_millis(3000));
    }

    #[test]
    fn test_invalid_credential_hex_rejected() {
        let config: NodeConfig = toml::from_str(
            r#"
            [access]
            allowed = ["not-hex!"]
            "#,
        )
        .unwrap();

        let result = config.allow_list();
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("not-hex!"));
    }

    #[test]
    fn test_empty_allow_list_rejected() {
        let config: NodeConfig = toml::from_str(
            r#"
            [access]
            allowed = []
            "#,
        )
        .unwrap();

        assert!(config.allow_list().is_err());
    }

    #[test]
    fn test_negative_close_threshold_rejected() {
        let config: NodeConfig = toml::from_str(
            r#"
            [gate]
            close_threshold_cm = -3.0
            "#,
        )
        .unwrap();

        assert!(config.gate_config().is_err());
    }

    #[test]
    fn test_angle_over_servo_range_rejected() {
        let config: NodeConfig = toml::from_str(
            r#"
            [gate]
            closed_angle_deg = 181
            "#,
        )
        .unwrap();

        assert!(config.gate_angles().is_err());
    }

    #[test]
    fn test_zero_free_threshold_rejected() {
        let config: NodeConfig = toml::from_str(
            r#"
            [occupancy]
            free_thresholds = [500, 0, 400]
            "#,
        )
        .unwrap();

        assert!(config.occupancy_monitor().is_err());
    }

    #[test]
    fn test_period_below_minimum_rejected() {
        let config: NodeConfig = toml::from_str(
            r#"
            [cycle]
            period_ms = 50
            "#,
        )
        .unwrap();

        assert!(config.cycle_period().is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cycle]").unwrap();
        writeln!(file, "period_ms = 250").unwrap();

        let config = NodeConfig::load(file.path()).unwrap();
        assert_eq!(config.cycle.period_ms, 250);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = NodeConfig::load(Path::new("/nonexistent/boomgate.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cycle").unwrap();

        assert!(NodeConfig::load(file.path()).is_err());
    }
}
