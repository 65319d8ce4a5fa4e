//! Status display
//!
//! The beacon reports its state as three text lines on a small monochrome
//! screen: the beacon label, a centred status line and an optional
//! "New message!" indicator.

use log::warn;

/// Glyph advance of the display font in pixels
pub const GLYPH_WIDTH: u32 = 5;

/// Text shown on the indicator line
pub const INDICATOR_TEXT: &str = "New message!";

const TITLE_ROW: i32 = 0;
const STATUS_ROW: i32 = 12;
const INDICATOR_ROW: i32 = 24;

/// Status line shown by the beacon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Waiting for the channel to stay quiet
    ClearingFrequency,
    /// Traffic heard during the clearance check
    FrequencyNotClear,
    /// Transmit sweep in progress
    SendingPings,
    /// Transmit sweep aborted
    SendError,
    /// Listen window in progress
    Listening,
    /// Readable reply received
    HeardReply,
    /// Unreadable packet received
    Noise,
}

impl Status {
    /// Text of the status line
    pub fn text(self) -> &'static str {
        match self {
            Status::ClearingFrequency => "Clearing freq...",
            Status::FrequencyNotClear => "Freq not clear!",
            Status::SendingPings => "Sending pings...",
            Status::SendError => "error sending pings",
            Status::Listening => "Listening...",
            Status::HeardReply => "Heard a reply!",
            Status::Noise => "Ew! Noise?",
        }
    }
}

/// Status rendering capability
///
/// Implementations must accept bodies of any length.
pub trait StatusDisplay {
    /// Replace the screen content
    fn show(&mut self, title: &str, body: &str, show_indicator: bool);
}

/// Text drawing surface provided by a display driver
pub trait TextCanvas {
    /// Error type for display operations
    type Error: core::fmt::Debug;

    /// Width of the drawing area in pixels
    fn width(&self) -> u32;

    /// Blank the frame buffer
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw text with its top left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Push the frame buffer to the panel
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// `StatusDisplay` laid out on a `TextCanvas`
pub struct TextScreen<C> {
    canvas: C,
}

impl<C: TextCanvas> TextScreen<C> {
    /// Create a new screen
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    /// Underlying canvas
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Release the canvas
    pub fn release(self) -> C {
        self.canvas
    }

    fn centred_x(&self, text: &str) -> i32 {
        let text_width = (text.chars().count() as u32).saturating_mul(GLYPH_WIDTH);
        (self.canvas.width().saturating_sub(text_width) / 2) as i32
    }

    fn draw(&mut self, title: &str, body: &str, show_indicator: bool) -> Result<(), C::Error> {
        self.canvas.clear()?;
        self.canvas.draw_text(title, self.centred_x(title), TITLE_ROW)?;
        self.canvas.draw_text(body, self.centred_x(body), STATUS_ROW)?;
        if show_indicator {
            self.canvas
                .draw_text(INDICATOR_TEXT, self.centred_x(INDICATOR_TEXT), INDICATOR_ROW)?;
        }
        self.canvas.flush()
    }
}

impl<C: TextCanvas> StatusDisplay for TextScreen<C> {
    fn show(&mut self, title: &str, body: &str, show_indicator: bool) {
        if let Err(e) = self.draw(title, body, show_indicator) {
            warn!("display update failed: {:?}", e);
        }
    }
}
