//! Status panel rendering for the parking lane node.
//!
//! This crate composes one full frame per control cycle onto the 128x64
//! monochrome panel exposed through the [`StatusScreen`] trait. The renderer
//! is a pure frame composer: it owns no gate or occupancy state and draws
//! exactly what the snapshot handed to it says.
//!
//! # Frame Layout
//!
//! Every frame is drawn from scratch in a fixed order:
//!
//! ```text
//! +----------------------------------+  <- border, full panel
//! |                                  |
//! |   Insert ID                      |  <- caption at (10, 5)
//! |                                  |
//! |   Available: 2                   |  <- free-spot count at (10, 20)
//! |                                  |
//! |   S1: O S2: X S3: O              |  <- per-spot flags at (10, 35)
//! |                                  |
//! | ######################           |  <- availability bar, bottom edge
//! +----------------------------------+
//! ```
//!
//! The bar width maps the free-spot count from `[0, total]` onto
//! `[0, panel width]` with integer arithmetic, so a full lot draws no bar
//! and an empty lot fills the whole bottom edge.
//!
//! # Examples
//!
//! ```
//! use boomgate_core::OccupancySnapshot;
//! use boomgate_display::StatusPanel;
//! use boomgate_hardware::traits::StatusScreen;
//!
//! async fn refresh<S: StatusScreen>(
//!     screen: &mut S,
//!     snapshot: &OccupancySnapshot,
//! ) -> boomgate_hardware::Result<()> {
//!     let panel = StatusPanel::new();
//!     panel.render(screen, snapshot).await
//! }
//! ```

use boomgate_core::OccupancySnapshot;
use boomgate_core::constants::{PANEL_HEIGHT, PANEL_WIDTH};
use boomgate_hardware::Result;
use boomgate_hardware::traits::StatusScreen;

/// Left margin for all text rows, in pixels.
const TEXT_MARGIN_X: u32 = 10;

/// Vertical position of the caption row.
const CAPTION_Y: u32 = 5;

/// Vertical position of the free-spot count row.
const AVAILABLE_Y: u32 = 20;

/// Vertical position of the per-spot flag row.
const SPOTS_Y: u32 = 35;

/// Height of the availability bar, in pixels.
const BAR_HEIGHT: u32 = 5;

/// Distance from the panel's bottom edge to the top of the bar.
const BAR_BOTTOM_OFFSET: u32 = 9;

/// Frame composer for the lane status panel.
///
/// Holds only the caption text; everything else on the frame comes from the
/// occupancy snapshot passed to [`render`](Self::render). One instance lives
/// for the whole node lifetime and is reused every cycle.
///
/// # Examples
///
/// ```
/// use boomgate_display::StatusPanel;
///
/// let panel = StatusPanel::new();
/// assert_eq!(panel.caption(), "Insert ID");
///
/// let panel = StatusPanel::with_caption("Ticket required");
/// assert_eq!(panel.caption(), "Ticket required");
/// ```
#[derive(Debug, Clone)]
pub struct StatusPanel {
    caption: String,
}

impl StatusPanel {
    /// Create a panel with the standard `Insert ID` caption.
    pub fn new() -> Self {
        Self {
            caption: "Insert ID".to_string(),
        }
    }

    /// Create a panel with a custom caption on the top text row.
    pub fn with_caption(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
        }
    }

    /// The caption drawn on the top text row of every frame.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Draw one complete frame and push it to the panel.
    ///
    /// The frame is always rebuilt in full: clear, border, caption,
    /// free-spot count, per-spot flags, availability bar, flush. The caption
    /// is drawn on every frame regardless of gate state, matching the
    /// installed signage.
    ///
    /// # Errors
    ///
    /// Returns the first screen error encountered; the frame is abandoned
    /// mid-draw in that case and the next cycle starts over from `clear`.
    pub async fn render<S: StatusScreen>(
        &self,
        screen: &mut S,
        snapshot: &OccupancySnapshot,
    ) -> Result<()> {
        let free = snapshot.free_count();
        let total = snapshot.total();

        screen.clear().await?;
        screen.draw_rect(0, 0, PANEL_WIDTH, PANEL_HEIGHT).await?;
        screen.draw_text(TEXT_MARGIN_X, CAPTION_Y, &self.caption).await?;
        screen
            .draw_text(TEXT_MARGIN_X, AVAILABLE_Y, &available_line(free))
            .await?;
        screen
            .draw_text(TEXT_MARGIN_X, SPOTS_Y, &spot_flags_line(snapshot))
            .await?;
        screen
            .fill_rect(
                0,
                PANEL_HEIGHT - BAR_BOTTOM_OFFSET,
                bar_width(free, total, PANEL_WIDTH),
                BAR_HEIGHT,
            )
            .await?;
        screen.flush().await
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Width of the availability bar for a given free-spot count.
///
/// Maps `free` from `[0, total]` onto `[0, width]` with integer arithmetic,
/// the same mapping the bottom bar uses on the panel. A zero-capacity lot
/// draws no bar.
///
/// # Arguments
///
/// * `free` - Number of free spots
/// * `total` - Total number of spots
/// * `width` - Panel width in pixels
///
/// # Examples
///
/// ```
/// use boomgate_display::bar_width;
///
/// assert_eq!(bar_width(0, 3, 128), 0);
/// assert_eq!(bar_width(1, 3, 128), 42);
/// assert_eq!(bar_width(2, 3, 128), 85);
/// assert_eq!(bar_width(3, 3, 128), 128);
/// ```
pub fn bar_width(free: usize, total: usize, width: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // A free count beyond capacity pins the bar at full width
    let free = free.min(total) as u32;
    free * width / total as u32
}

/// Text for the free-spot count row.
///
/// # Examples
///
/// ```
/// use boomgate_display::available_line;
///
/// assert_eq!(available_line(3), "Available: 3");
/// assert_eq!(available_line(0), "Available: 0");
/// ```
pub fn available_line(free: usize) -> String {
    format!("Available: {free}")
}

/// Text for the per-spot flag row, `O` for free and `X` for occupied.
///
/// Spots are numbered from 1 in the order they appear in the snapshot.
///
/// # Examples
///
/// ```
/// use boomgate_core::{OccupancySnapshot, SpotStatus};
/// use boomgate_display::spot_flags_line;
///
/// let snapshot = OccupancySnapshot::new([
///     SpotStatus::Free,
///     SpotStatus::Occupied,
///     SpotStatus::Free,
/// ]);
/// assert_eq!(spot_flags_line(&snapshot), "S1: O S2: X S3: O");
/// ```
pub fn spot_flags_line(snapshot: &OccupancySnapshot) -> String {
    snapshot
        .spots()
        .iter()
        .enumerate()
        .map(|(index, spot)| {
            let flag = if spot.is_free() { 'O' } else { 'X' };
            format!("S{}: {}", index + 1, flag)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
