use std::fmt;

use crate::NO_TEMPERATURE;

/// Temperature in 0.25 °C resolution.
///
/// `degrees` is the (two's complement) integer part, `fraction` the
/// hundredths added on top: 0, 25, 50 or 75. -0.25 °C is `{ degrees: -1,
/// fraction: 75 }`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Temperature {
	pub degrees: i8,
	pub fraction: u8,
}

impl Temperature {
	/// legacy "no reading" value
	pub const NOT_AVAILABLE: Temperature = Temperature {
		degrees: NO_TEMPERATURE,
		fraction: NO_TEMPERATURE as u8,
	};

	/// from the MSB (0x11) and LSB (0x12) temperature registers
	pub fn from_registers(msb: u8, lsb: u8) -> Self {
		Temperature {
			degrees: msb as i8,
			fraction: (lsb >> 6) * 25,
		}
	}

	pub fn is_available(&self) -> bool {
		*self != Self::NOT_AVAILABLE
	}

	pub fn to_celsius(&self) -> f32 {
		f32::from(self.degrees) + f32::from(self.fraction) / 100.0
	}

	pub fn to_fahrenheit(&self) -> f32 {
		celsius_to_fahrenheit(self.to_celsius())
	}
}

impl fmt::Display for Temperature {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if !self.is_available() {
			return write!(f, "n/a");
		}
		write!(f, "{:.2} °C", self.to_celsius())
	}
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
	celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
	(fahrenheit - 32.0) * 5.0 / 9.0
}
