//! Control logic for the boomgate parking node.
//!
//! This crate contains the pure decision-making pieces of the node: the
//! credential allow list, the gate access and auto-close state machine, and
//! the occupancy classifier. Peripheral I/O lives in `boomgate-hardware`;
//! scheduling and wiring live in the node binary.

pub mod auth;
pub mod controller;
pub mod error;
pub mod occupancy;

pub use auth::AllowList;
pub use controller::{
    GateConfig, GateController, GateTimings, GateTransition, RangeOutcome, ScanOutcome,
};
pub use error::{Error, Result};
pub use occupancy::OccupancyMonitor;
