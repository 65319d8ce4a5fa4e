//! Acknowledgment button

use embedded_hal::digital::v2::InputPin;
use log::warn;

/// Operator acknowledgment button
pub trait AckButton {
    /// Sample the button, `true` while it is held down
    fn is_pressed(&mut self) -> bool;
}

/// Push button wired to ground with a pull-up, so a press reads low
pub struct ActiveLowButton<P> {
    pin: P,
}

impl<P: InputPin> ActiveLowButton<P> {
    /// Wrap an input pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> AckButton for ActiveLowButton<P>
where
    P: InputPin,
    P::Error: core::fmt::Debug,
{
    fn is_pressed(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(pressed) => pressed,
            Err(e) => {
                warn!("button read failed: {:?}", e);
                false
            }
        }
    }
}
