//! Mock gate actuator implementation for testing and development.

use crate::{Result, traits::GateActuator};
use boomgate_core::GateState;
use tokio::sync::mpsc;

/// Mock barrier actuator.
///
/// Every commanded state is recorded and streamed to the paired
/// [`MockGateActuatorHandle`], so tests can assert on the exact command
/// sequence (for example, exactly one open command per granted access).
///
/// Commands always succeed: the real mechanism gives no feedback, so the
/// mock is fire-and-forget too. If the handle has been dropped, commands are
/// simply no longer recorded.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::mock::MockGateActuator;
/// use boomgate_hardware::traits::GateActuator;
/// use boomgate_core::GateState;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (mut actuator, mut handle) = MockGateActuator::new();
///
///     actuator.set_gate(GateState::Open).await?;
///     actuator.set_gate(GateState::Closed).await?;
///
///     assert_eq!(handle.take_commands(), vec![GateState::Open, GateState::Closed]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockGateActuator {
    /// Channel sender for commanded states
    command_tx: mpsc::UnboundedSender<GateState>,

    /// Most recently commanded state
    last_commanded: Option<GateState>,

    /// Device name
    name: String,
}

impl MockGateActuator {
    /// Create a new mock actuator with the default name.
    pub fn new() -> (Self, MockGateActuatorHandle) {
        Self::with_name("Mock Gate Actuator".to_string())
    }

    /// Create a new mock actuator with a custom name.
    pub fn with_name(name: String) -> (Self, MockGateActuatorHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let actuator = Self {
            command_tx,
            last_commanded: None,
            name: name.clone(),
        };

        let handle = MockGateActuatorHandle { command_rx, name };

        (actuator, handle)
    }

    /// Get the most recently commanded state, if any.
    ///
    /// This is useful for asserting on the final barrier position without
    /// draining the handle.
    pub fn last_commanded(&self) -> Option<GateState> {
        self.last_commanded
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for MockGateActuator {
    fn default() -> Self {
        Self::new().0
    }
}

impl GateActuator for MockGateActuator {
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    async fn set_gate(&mut self, state: GateState) -> Result<()> {
        self.last_commanded = Some(state);
        // A dropped handle only means nobody is watching the commands.
        let _ = self.command_tx.send(state);
        Ok(())
    }
}

/// Handle for observing a mock gate actuator.
#[derive(Debug)]
pub struct MockGateActuatorHandle {
    /// Channel receiver for commanded states
    command_rx: mpsc::UnboundedReceiver<GateState>,

    /// Device name
    name: String,
}

impl MockGateActuatorHandle {
    /// Drain and return every command issued since the last call.
    pub fn take_commands(&mut self) -> Vec<GateState> {
        let mut commands = Vec::new();
        while let Ok(state) = self.command_rx.try_recv() {
            commands.push(state);
        }
        commands
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commands_are_recorded_in_order() {
        let (mut actuator, mut handle) = MockGateActuator::new();

        actuator.set_gate(GateState::Open).await.unwrap();
        actuator.set_gate(GateState::Open).await.unwrap();
        actuator.set_gate(GateState::Closed).await.unwrap();

        assert_eq!(
            handle.take_commands(),
            vec![GateState::Open, GateState::Open, GateState::Closed]
        );
    }

    #[tokio::test]
    async fn test_take_commands_drains() {
        let (mut actuator, mut handle) = MockGateActuator::new();

        actuator.set_gate(GateState::Open).await.unwrap();
        assert_eq!(handle.take_commands(), vec![GateState::Open]);
        assert!(handle.take_commands().is_empty());
    }

    #[tokio::test]
    async fn test_last_commanded_tracks_latest() {
        let (mut actuator, _handle) = MockGateActuator::new();

        assert_eq!(actuator.last_commanded(), None);

        actuator.set_gate(GateState::Open).await.unwrap();
        assert_eq!(actuator.last_commanded(), Some(GateState::Open));

        actuator.set_gate(GateState::Closed).await.unwrap();
        assert_eq!(actuator.last_commanded(), Some(GateState::Closed));
    }

    #[tokio::test]
    async fn test_set_gate_succeeds_without_observer() {
        let (mut actuator, handle) = MockGateActuator::new();
        drop(handle);

        // Fire-and-forget even when nobody records the command.
        actuator.set_gate(GateState::Closed).await.unwrap();
        assert_eq!(actuator.last_commanded(), Some(GateState::Closed));
    }
}
