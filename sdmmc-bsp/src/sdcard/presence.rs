use embedded_hal::digital::v2::InputPin;
use log::warn;
use void::Void;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectLevel {
    Low,
    High,
}

/// Card-detect switch on a GPIO line.
pub struct CardDetect<P: InputPin> {
    pin: P,
    level: DetectLevel,
}

impl<P: InputPin> CardDetect<P> {
    pub fn new(pin: P, level: DetectLevel) -> Self {
        CardDetect { pin, level }
    }

    /// A pin that cannot be read counts as an empty slot.
    pub fn is_present(&self) -> bool {
        let reading = match self.level {
            DetectLevel::Low => self.pin.is_low(),
            DetectLevel::High => self.pin.is_high(),
        };
        match reading {
            Ok(present) => present,
            Err(_) => {
                warn!("card detect pin read failed, treating slot as empty");
                false
            },
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

/// Stand-in detect pin for slots without a switch. Reads as present at either
/// polarity.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysPresent;

impl InputPin for AlwaysPresent {
    type Error = Void;

    fn is_high(&self) -> Result<bool, Void> {
        Ok(true)
    }

    fn is_low(&self) -> Result<bool, Void> {
        Ok(true)
    }
}
