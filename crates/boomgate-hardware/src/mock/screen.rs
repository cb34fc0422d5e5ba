//! Mock status screen implementation for testing and development.

use crate::{Result, traits::StatusScreen};
use boomgate_core::constants::{PANEL_HEIGHT, PANEL_WIDTH};
use tokio::sync::mpsc;

/// One drawing primitive recorded by the mock screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    /// Frame buffer cleared.
    Clear,

    /// Rectangle outline drawn.
    Rect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Filled rectangle drawn.
    FillRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Text drawn with its top-left corner at (x, y).
    Text { x: u32, y: u32, text: String },

    /// Frame buffer pushed to the glass.
    Flush,
}

/// Mock 128x64 status screen.
///
/// Records every drawing primitive and streams it to the paired
/// [`MockStatusScreenHandle`], so display tests can assert on the exact
/// composition of a frame. Geometry is validated against the panel
/// dimensions the way a real driver would reject out-of-bounds draws.
///
/// # Examples
///
/// ```
/// use boomgate_hardware::mock::{DrawOp, MockStatusScreen};
/// use boomgate_hardware::traits::StatusScreen;
///
/// #[tokio::main]
/// async fn main() -> boomgate_hardware::Result<()> {
///     let (mut screen, mut handle) = MockStatusScreen::new();
///
///     screen.clear().await?;
///     screen.draw_text(10, 5, "Insert ID").await?;
///     screen.flush().await?;
///
///     let ops = handle.take_ops();
///     assert_eq!(ops[0], DrawOp::Clear);
///     assert_eq!(ops[2], DrawOp::Flush);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockStatusScreen {
    /// Channel sender for recorded primitives
    op_tx: mpsc::UnboundedSender<DrawOp>,

    /// Whether initialize() should fail
    fail_init: bool,

    /// Device name
    name: String,
}

impl MockStatusScreen {
    /// Create a new mock screen with the default name.
    pub fn new() -> (Self, MockStatusScreenHandle) {
        Self::with_name("Mock Status Screen".to_string())
    }

    /// Create a new mock screen with a custom name.
    pub fn with_name(name: String) -> (Self, MockStatusScreenHandle) {
        let (op_tx, op_rx) = mpsc::unbounded_channel();

        let screen = Self {
            op_tx,
            fail_init: false,
            name: name.clone(),
        };

        let handle = MockStatusScreenHandle { op_rx, name };

        (screen, handle)
    }

    /// Create a mock screen whose bring-up fails.
    ///
    /// Models a panel that is absent from the bus, the one peripheral
    /// failure that must halt the node at startup.
    pub fn with_init_failure() -> (Self, MockStatusScreenHandle) {
        let (mut screen, handle) = Self::new();
        screen.fail_init = true;
        (screen, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, op: DrawOp) {
        // A dropped handle only means nobody is watching the frame.
        let _ = self.op_tx.send(op);
    }

    fn check_rect(&self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        if x + width > PANEL_WIDTH || y + height > PANEL_HEIGHT {
            return Err(crate::HardwareError::invalid_data(format!(
                "Rectangle {}x{} at ({}, {}) exceeds {}x{} panel",
                width, height, x, y, PANEL_WIDTH, PANEL_HEIGHT
            )));
        }
        Ok(())
    }
}

impl Default for MockStatusScreen {
    fn default() -> Self {
        Self::new().0
    }
}

impl StatusScreen for MockStatusScreen {
    async fn initialize(&mut self) -> Result<()> {
        if self.fail_init {
            return Err(crate::HardwareError::initialization_failed(
                "panel not responding at 0x3C",
            ));
        }
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.record(DrawOp::Clear);
        Ok(())
    }

    async fn draw_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        self.check_rect(x, y, width, height)?;
        self.record(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    async fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        self.check_rect(x, y, width, height)?;
        self.record(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    async fn draw_text(&mut self, x: u32, y: u32, text: &str) -> Result<()> {
        if x >= PANEL_WIDTH || y >= PANEL_HEIGHT {
            return Err(crate::HardwareError::invalid_data(format!(
                "Text origin ({}, {}) lies outside {}x{} panel",
                x, y, PANEL_WIDTH, PANEL_HEIGHT
            )));
        }
        self.record(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.record(DrawOp::Flush);
        Ok(())
    }
}

/// Handle for observing a mock status screen.
#[derive(Debug)]
pub struct MockStatusScreenHandle {
    /// Channel receiver for recorded primitives
    op_rx: mpsc::UnboundedReceiver<DrawOp>,

    /// Device name
    name: String,
}

impl MockStatusScreenHandle {
    /// Drain and return every primitive recorded since the last call.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        while let Ok(op) = self.op_rx.try_recv() {
            ops.push(op);
        }
        ops
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
    async fn test_frame_is_recorded_in_order() {
        let (mut screen, mut handle) = MockStatusScreen::new();

        screen.clear().await.unwrap();
        screen.draw_rect(0, 0, 128, 64).await.unwrap();
        screen.draw_text(10, 5, "Insert ID").await.unwrap();
        screen.fill_rect(0, 55, 85, 5).await.unwrap();
        screen.flush().await.unwrap();

        let ops = handle.take_ops();
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[0], DrawOp::Clear);
        assert_eq!(
            ops[1],
            DrawOp::Rect {
                x: 0,
                y: 0,
                width: 128,
                height: 64
            }
        );
        assert_eq!(
            ops[2],
            DrawOp::Text {
                x: 10,
                y: 5,
                text: "Insert ID".to_string()
            }
        );
        assert_eq!(ops[4], DrawOp::Flush);
    }

    #[tokio::test]
    async fn test_rejects_rect_outside_panel() {
        let (mut screen, _handle) = MockStatusScreen::new();

        let result = screen.draw_rect(0, 0, 129, 64).await;
        assert!(matches!(
            result,
            Err(crate::HardwareError::InvalidData { .. })
        ));

        let result = screen.fill_rect(120, 60, 10, 10).await;
        assert!(matches!(
            result,
            Err(crate::HardwareError::InvalidData { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_text_origin_outside_panel() {
        let (mut screen, _handle) = MockStatusScreen::new();

        let result = screen.draw_text(128, 0, "x").await;
        assert!(matches!(
            result,
            Err(crate::HardwareError::InvalidData { .. })
        ));
    }

    #[tokio::test]
    async fn test_initialize_can_be_armed_to_fail() {
        let (mut screen, _handle) = MockStatusScreen::with_init_failure();

        let result = screen.initialize().await;
        assert!(matches!(
            result,
            Err(crate::HardwareError::InitializationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_initialize_succeeds_by_default() {
        let (mut screen, _handle) = MockStatusScreen::new();
        screen.initialize().await.unwrap();
    }

    #[tokio::test]
    async fn test_take_ops_drains() {
        let (mut screen, mut handle) = MockStatusScreen::new();

        screen.clear().await.unwrap();
        assert_eq!(handle.take_ops(), vec![DrawOp::Clear]);
        assert!(handle.take_ops().is_empty());
    }
}
