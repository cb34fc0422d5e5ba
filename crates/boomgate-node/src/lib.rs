//! Lane node wiring: configuration, the control loop, and simulation mode.
//!
//! The binary in `main.rs` parses the CLI and hands off here: [`config`]
//! loads and validates the TOML file, [`cycle`] owns the peripherals and
//! advances the node one control cycle at a time, and [`sim`] drives the
//! loop from an interactive stdin script.
//!
//! Decision logic lives in `boomgate-control`; peripheral contracts in
//! `boomgate-hardware`. This crate only wires them together and schedules
//! the loop.

pub mod config;
pub mod cycle;
pub mod sim;

pub use config::NodeConfig;
pub use cycle::{ControlCycle, MockHandles, Peripherals};
