//! Interactive simulation mode.
//!
//! Runs the complete control loop against the mock peripheral set, driven
//! by a line-oriented command script on stdin. The loop keeps ticking at
//! the configured period while commands arrive, so timing behavior (settle
//! windows, clearance delays) plays out exactly as it would on hardware.
//!
//! # Commands
//!
//! ```text
//! scan <hex>        present a credential (8 hex digits, e.g. scan 030C4916)
//! range <cm>        set the lane distance reading
//! noecho            make the range sensor lose its echo
//! pad <spot> <raw>  set one pressure pad's raw reading (spot 0-2, raw 0-1023)
//! status            print gate state, deadlines and occupancy
//! quit              stop the node
//! ```
//!
//! An end of file on stdin stops the node the same way `quit` does, so the
//! simulator also runs scripted: `boomgate-node simulate < script.txt`.

use anyhow::Context;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use boomgate_core::CredentialId;
use boomgate_core::constants::{ADC_MAX, SPOT_COUNT};

use crate::cycle::{ControlCycle, MockHandles};

/// One parsed simulator command.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// Present a credential to the reader.
    Scan(CredentialId),

    /// Set the lane distance reading in centimeters.
    Range(f32),

    /// Make the range sensor lose its echo.
    NoEcho,

    /// Set one pressure pad's raw reading.
    Pad { spot: usize, raw: u16 },

    /// Print the node's current state.
    Status,

    /// Stop the node.
    Quit,
}

/// Errors from parsing a simulator command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Line contained no command word.
    #[error("empty command line")]
    Empty,

    /// First word is not a known command.
    #[error("unknown command {command:?} (commands: scan, range, noecho, pad, status, quit)")]
    UnknownCommand { command: String },

    /// Arguments missing, malformed or out of range.
    #[error("usage: {usage}")]
    BadUsage { usage: &'static str },
}

/// Parse one command line.
///
/// # Examples
///
/// ```
/// use boomgate_node::sim::{parse_command, SimCommand};
///
/// let command = parse_command("range 42.5").unwrap();
/// assert_eq!(command, SimCommand::Range(42.5));
/// ```
pub fn parse_command(line: &str) -> Result<SimCommand, ParseError> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Err(ParseError::Empty);
    };

    let parsed = match command {
        "scan" => {
            const USAGE: &str = "scan <8-hex-digit-credential>";
            let hex = parts.next().ok_or(ParseError::BadUsage { usage: USAGE })?;
            let credential = hex
                .parse::<CredentialId>()
                .map_err(|_| ParseError::BadUsage { usage: USAGE })?;
            SimCommand::Scan(credential)
        }
        "range" => {
            const USAGE: &str = "range <distance-cm>";
            let cm = parts
                .next()
                .and_then(|value| value.parse::<f32>().ok())
                .ok_or(ParseError::BadUsage { usage: USAGE })?;
            if !cm.is_finite() || cm < 0.0 {
                return Err(ParseError::BadUsage { usage: USAGE });
            }
            SimCommand::Range(cm)
        }
        "noecho" => SimCommand::NoEcho,
        "pad" => {
            const USAGE: &str = "pad <spot 0-2> <raw 0-1023>";
            let spot = parts
                .next()
                .and_then(|value| value.parse::<usize>().ok())
                .ok_or(ParseError::BadUsage { usage: USAGE })?;
            let raw = parts
                .next()
                .and_then(|value| value.parse::<u16>().ok())
                .ok_or(ParseError::BadUsage { usage: USAGE })?;
            if spot >= SPOT_COUNT || raw > ADC_MAX {
                return Err(ParseError::BadUsage { usage: USAGE });
            }
            SimCommand::Pad { spot, raw }
        }
        "status" => SimCommand::Status,
        "quit" => SimCommand::Quit,
        other => {
            return Err(ParseError::UnknownCommand {
                command: other.to_string(),
            });
        }
    };

    // Trailing arguments are a mistyped command, not noise to ignore
    if parts.next().is_some() {
        return Err(ParseError::BadUsage {
            usage: "too many arguments (try: status)",
        });
    }

    Ok(parsed)
}

/// Drive the control loop from stdin until `quit` or end of file.
pub async fn run(mut cycle: ControlCycle, handles: MockHandles) -> anyhow::Result<()> {
    println!("Simulation mode. Commands: scan <hex>, range <cm>, noecho, pad <spot> <raw>, status, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(cycle.period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => cycle.run_cycle().await,
            line = lines.next_line() => {
                let Some(line) = line.context("reading simulator input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(line.trim()) {
                    Ok(SimCommand::Quit) => break,
                    Ok(command) => apply_command(command, &cycle, &handles).await?,
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    cycle.shutdown().await;
    Ok(())
}

/// Apply one command to the mock peripherals or print node state.
async fn apply_command(
    command: SimCommand,
    cycle: &ControlCycle,
    handles: &MockHandles,
) -> anyhow::Result<()> {
    match command {
        SimCommand::Scan(credential) => {
            handles
                .reader
                .present_tag(credential)
                .await
                .context("presenting credential")?;
            println!("presented credential {credential}");
        }
        SimCommand::Range(cm) => {
            handles
                .ranger
                .set_distance(cm)
                .await
                .context("setting lane distance")?;
            println!("lane distance set to {cm:.1} cm");
        }
        SimCommand::NoEcho => {
            handles
                .ranger
                .set_no_echo()
                .await
                .context("dropping range echo")?;
            println!("range sensor echo lost");
        }
        SimCommand::Pad { spot, raw } => {
            handles
                .pads
                .set_raw(spot, raw)
                .await
                .context("setting pad reading")?;
            println!("pad {spot} raw reading set to {raw}");
        }
        SimCommand::Status => print_status(cycle),
        SimCommand::Quit => {}
    }
    Ok(())
}

/// Print a short state summary for the `status` command.
fn print_status(cycle: &ControlCycle) {
    let controller = cycle.controller();
    let watching = if controller.is_sampling() {
        " (watching lane)"
    } else {
        ""
    };
    println!("gate: {}{}", controller.state(), watching);
    println!("  in phase for {:?}", controller.time_in_phase());
    if let Some(remaining) = controller.deadline_remaining() {
        println!("  next deadline in {remaining:?}");
    }

    let snapshot = cycle.last_snapshot();
    println!(
        "  available: {} of {}",
        snapshot.free_count(),
        snapshot.total()
    );

    for transition in controller.history().iter().rev().take(3) {
        println!(
            "  {} -> {} ({:?} ago)",
            transition.from,
            transition.to,
            transition.elapsed()
        );
    }
}
