//! The lane control loop.
//!
//! [`ControlCycle`] owns every peripheral and every piece of decision logic,
//! and advances the whole node by one step each time [`run_cycle`] is
//! called. One cycle, in order:
//!
//! 1. Check controller deadlines; an expired clearance delay drives the
//!    gate closed here.
//! 2. Read the pressure pads and reclassify the spots.
//! 3. Poll the credential reader; a scan is authorized against the allow
//!    list and handed to the gate controller.
//! 4. If the controller is watching the lane, take a range sample and hand
//!    it over; a vehicle reading schedules the close.
//! 5. Redraw the status panel.
//! 6. Publish the free-spot count, when telemetry is configured.
//!
//! Per-cycle peripheral errors are absorbed: a failed credential read is
//! this cycle's "no scan", a failed range read is "no echo", and failed
//! pad reads keep the previous snapshot. The controller itself never sees
//! an error value. Only bring-up failures are fatal.
//!
//! [`run_cycle`]: ControlCycle::run_cycle

use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use boomgate_control::{AllowList, GateController, OccupancyMonitor, RangeOutcome, ScanOutcome};
use boomgate_core::constants::SPOT_COUNT;
use boomgate_core::{DistanceSample, GateAngles, GateState, OccupancySnapshot, SpotStatus};
use boomgate_display::StatusPanel;
use boomgate_hardware::mock::{
    MockCredentialReader, MockCredentialReaderHandle, MockGateActuator, MockGateActuatorHandle,
    MockPressurePads, MockPressurePadsHandle, MockRangeSensor, MockRangeSensorHandle,
    MockStatusScreen, MockStatusScreenHandle,
};
use boomgate_hardware::{
    AnyCredentialReader, AnyGateActuator, AnyPressurePads, AnyRangeSensor, AnyStatusScreen,
    CredentialReader, GateActuator, PressurePads, RangeSensor, StatusScreen,
};
use boomgate_telemetry::TelemetryClient;

use crate::config::NodeConfig;

/// The five peripherals a lane node drives.
#[derive(Debug)]
pub struct Peripherals {
    pub reader: AnyCredentialReader,
    pub ranger: AnyRangeSensor,
    pub actuator: AnyGateActuator,
    pub pads: AnyPressurePads,
    pub screen: AnyStatusScreen,
}

/// Handles for driving a mock peripheral set from outside the loop.
#[derive(Debug)]
pub struct MockHandles {
    pub reader: MockCredentialReaderHandle,
    pub ranger: MockRangeSensorHandle,
    pub actuator: MockGateActuatorHandle,
    pub pads: MockPressurePadsHandle,
    pub screen: MockStatusScreenHandle,
}

impl Peripherals {
    /// Build a complete mock peripheral set plus its control handles.
    ///
    /// Used by the simulation mode and by tests; also what `run` wires up
    /// until the GPIO and I2C backends land.
    pub fn mock() -> (Self, MockHandles) {
        let (reader, reader_handle) = MockCredentialReader::new();
        let (ranger, ranger_handle) = MockRangeSensor::new();
        let (actuator, actuator_handle) = MockGateActuator::new();
        let (pads, pads_handle) = MockPressurePads::new();
        let (screen, screen_handle) = MockStatusScreen::new();

        let peripherals = Self {
            reader: AnyCredentialReader::Mock(reader),
            ranger: AnyRangeSensor::Mock(ranger),
            actuator: AnyGateActuator::Mock(actuator),
            pads: AnyPressurePads::Mock(pads),
            screen: AnyStatusScreen::Mock(screen),
        };
        let handles = MockHandles {
            reader: reader_handle,
            ranger: ranger_handle,
            actuator: actuator_handle,
            pads: pads_handle,
            screen: screen_handle,
        };

        (peripherals, handles)
    }
}

/// Single-owner driver for the whole lane node.
///
/// Exactly one instance exists per process. All state mutation happens
/// inside [`run_cycle`](Self::run_cycle) on one task; nothing here needs a
/// lock.
pub struct ControlCycle {
    reader: AnyCredentialReader,
    ranger: AnyRangeSensor,
    actuator: AnyGateActuator,
    pads: AnyPressurePads,
    screen: AnyStatusScreen,

    controller: GateController,
    allow_list: AllowList,
    monitor: OccupancyMonitor,
    angles: GateAngles,
    panel: StatusPanel,
    telemetry: Option<TelemetryClient>,

    /// Latest occupancy classification; starts pessimistic until the pads
    /// are read for the first time.
    snapshot: OccupancySnapshot,

    period: Duration,
}

impl ControlCycle {
    /// Wire a control cycle from a peripheral set and a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration section fails validation.
    /// This is the node's config check: a `ControlCycle` that constructs
    /// is ready to run.
    pub fn new(peripherals: Peripherals, config: &NodeConfig) -> anyhow::Result<Self> {
        let gate_config = config.gate_config()?;
        let angles = config.gate_angles()?;
        let allow_list = config.allow_list()?;
        let monitor = config.occupancy_monitor()?;
        let period = config.cycle_period()?;

        Ok(Self {
            reader: peripherals.reader,
            ranger: peripherals.ranger,
            actuator: peripherals.actuator,
            pads: peripherals.pads,
            screen: peripherals.screen,
            controller: GateController::with_config(gate_config),
            allow_list,
            monitor,
            angles,
            panel: StatusPanel::new(),
            telemetry: None,
            snapshot: OccupancySnapshot::new([SpotStatus::Occupied; SPOT_COUNT]),
            period,
        })
    }

    /// Attach a connected telemetry client.
    pub fn with_telemetry(mut self, client: TelemetryClient) -> Self {
        self.telemetry = Some(client);
        self
    }

    /// The gate controller, for state inspection.
    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    /// The most recent occupancy classification.
    pub fn last_snapshot(&self) -> &OccupancySnapshot {
        &self.snapshot
    }

    /// The configured control cycle period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Initialize every peripheral and drive the gate to its closed
    /// bring-up position.
    ///
    /// # Errors
    ///
    /// Any failure here is fatal: a lane node that cannot bring up its
    /// reader, actuator or display must not start the control loop.
    pub async fn bring_up(&mut self) -> anyhow::Result<()> {
        info!(
            closed_angle_deg = self.angles.closed_deg,
            open_angle_deg = self.angles.open_deg,
            spots = SPOT_COUNT,
            "Bringing up lane peripherals"
        );

        self.reader
            .initialize()
            .await
            .context("credential reader bring-up failed")?;
        self.actuator
            .initialize()
            .await
            .context("gate actuator bring-up failed")?;
        self.actuator
            .set_gate(GateState::Closed)
            .await
            .context("driving gate to closed position at bring-up failed")?;
        self.ranger
            .initialize()
            .await
            .context("range sensor bring-up failed")?;
        self.pads
            .initialize()
            .await
            .context("pressure pad bring-up failed")?;
        self.screen
            .initialize()
            .await
            .context("status panel bring-up failed; the node does not run blind")?;

        info!(state = %self.controller.state(), "Lane node ready");
        Ok(())
    }

    /// Advance the node by one control cycle.
    pub async fn run_cycle(&mut self) {
        // Expired deadlines act before new events are taken
        if let Some(transition) = self.controller.tick() {
            info!(from = %transition.from, to = %transition.to, "Clearance delay elapsed - closing gate");
            self.command_gate(transition.to).await;
        }

        self.sample_occupancy().await;
        self.poll_scan().await;
        self.sample_range().await;
        self.refresh_panel().await;
        self.publish_count().await;
    }

    /// Drive the loop forever at the configured period.
    ///
    /// Cycles that overrun simply delay the next tick; there is no
    /// catch-up burst.
    pub async fn run(&mut self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// Release external resources before exit.
    pub async fn shutdown(&mut self) {
        if let Some(client) = self.telemetry.as_mut() {
            if let Err(e) = client.close().await {
                warn!("Telemetry close failed: {}", e);
            }
        }
    }

    /// Issue one actuator command for a logical gate state.
    async fn command_gate(&mut self, state: GateState) {
        let angle = self.angles.angle_for(state);
        match self.actuator.set_gate(state).await {
            Ok(()) => debug!(%state, angle_deg = angle, "Gate actuator driven"),
            Err(e) => warn!(%state, "Failed to drive gate actuator: {}", e),
        }
    }

    /// Read the pads and reclassify; read failures keep the last snapshot.
    async fn sample_occupancy(&mut self) {
        match self.pads.read_raw().await {
            Ok(raw) => {
                self.snapshot = self.monitor.classify(raw);
                debug!(
                    ?raw,
                    free = self.snapshot.free_count(),
                    "Occupancy sampled"
                );
            }
            Err(e) => warn!("Pressure pad read failed: {} - keeping last snapshot", e),
        }
    }

    /// Poll for a credential and run it through authorization and the gate
    /// controller. A read failure is this cycle's "no scan".
    async fn poll_scan(&mut self) {
        let scan = match self.reader.poll_credential().await {
            Ok(scan) => scan,
            Err(e) => {
                debug!("Credential read failed: {} - no scan this cycle", e);
                None
            }
        };
        let Some(scan) = scan else {
            return;
        };

        let authorized = self.allow_list.is_authorized(&scan.credential);
        match self.controller.on_scan(authorized) {
            ScanOutcome::Opened => {
                info!(credential = %scan.credential, "Access granted - opening gate");
                self.command_gate(GateState::Open).await;
            }
            ScanOutcome::Denied => {
                warn!(credential = %scan.credential, "Access denied - credential not recognized");
            }
            ScanOutcome::Ignored => {
                debug!(
                    credential = %scan.credential,
                    state = %self.controller.state(),
                    "Scan ignored in current phase"
                );
            }
        }
    }

    /// Take a range sample while the controller is watching the lane.
    /// A failed measurement is handed over as "no echo", never as a
    /// distance.
    async fn sample_range(&mut self) {
        if !self.controller.is_sampling() {
            return;
        }

        let sample = match self.ranger.measure_distance().await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Range measurement failed: {} - treating as no echo", e);
                DistanceSample::NoEcho
            }
        };

        match sample.cm() {
            Some(cm) => debug!(distance_cm = cm, "Range sampled"),
            None => debug!("Range sampled: no echo"),
        }

        if let RangeOutcome::CloseScheduled = self.controller.on_distance(sample) {
            info!(distance = %sample, "Vehicle passed - gate close scheduled");
        }
    }

    /// Redraw the status panel from the latest snapshot.
    async fn refresh_panel(&mut self) {
        if let Err(e) = self.panel.render(&mut self.screen, &self.snapshot).await {
            warn!("Status panel refresh failed: {}", e);
        }
    }

    /// Push the free-spot count to the collection endpoint, best effort.
    async fn publish_count(&mut self) {
        let Some(client) = self.telemetry.as_mut() else {
            return;
        };
        let count = self.snapshot.free_count() as u32;
        if let Err(e) = client.publish(count).await {
            warn!(count, "Telemetry publish failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(toml: &str) -> NodeConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_wiring_from_default_config() {
        let (peripherals, _handles) = Peripherals::mock();
        let cycle = ControlCycle::new(peripherals, &NodeConfig::default()).unwrap();

        assert_eq!(cycle.period(), Duration::from_millis(500));
        assert!(cycle.controller().state().is_closed());
        assert_eq!(cycle.last_snapshot().free_count(), 0);
    }

    #[test]
    fn test_wiring_rejects_invalid_period() {
        let (peripherals, _handles) = Peripherals::mock();
        let config = config_from("[cycle]\nperiod_ms = 10\n");

        assert!(ControlCycle::new(peripherals, &config).is_err());
    }

    #[test]
    fn test_wiring_rejects_empty_allow_list() {
        let (peripherals, _handles) = Peripherals::mock();
        let config = config_from("[access]\nallowed = []\n");

        assert!(ControlCycle::new(peripherals, &config).is_err());
    }

    #[tokio::test]
    async fn test_bring_up_commands_closed_gate() {
        let (peripherals, mut handles) = Peripherals::mock();
        let mut cycle = ControlCycle::new(peripherals, &NodeConfig::default()).unwrap();

        cycle.bring_up().await.unwrap();

        assert_eq!(handles.actuator.take_commands(), vec![GateState::Closed]);
    }

    #[tokio::test]
    async fn test_bring_up_fails_when_screen_does_not_respond() {
        let (mut peripherals, _handles) = Peripherals::mock();
        let (screen, _screen_handle) = MockStatusScreen::with_init_failure();
        peripherals.screen = AnyStatusScreen::Mock(screen);

        let mut cycle = ControlCycle::new(peripherals, &NodeConfig::default()).unwrap();
        let result = cycle.bring_up().await;

        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("status panel"));
    }
}
