use std::fmt;

use super::consts::*;
use crate::RtcError;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Alarm {
	One,
	Two,
}

impl Alarm {
	pub fn from_index(alarm: u8) -> Option<Self> {
		match alarm {
			1 => Some(Alarm::One),
			2 => Some(Alarm::Two),
			_ => None,
		}
	}

	pub fn index(self) -> u8 {
		match self {
			Alarm::One => 1,
			Alarm::Two => 2,
		}
	}

	// first register of the alarm
	pub fn register(self) -> u8 {
		match self {
			Alarm::One => REG_ALARM1,
			Alarm::Two => REG_ALARM2,
		}
	}

	// alarm 2 has no seconds register
	pub fn register_count(self) -> usize {
		match self {
			Alarm::One => 4,
			Alarm::Two => 3,
		}
	}

	/// interrupt enable bit in the control register
	pub fn interrupt_enable(self) -> u8 {
		match self {
			Alarm::One => CONTROL_A1IE,
			Alarm::Two => CONTROL_A2IE,
		}
	}

	/// triggered flag in the status register
	pub fn flag(self) -> u8 {
		match self {
			Alarm::One => STATUS_A1F,
			Alarm::Two => STATUS_A2F,
		}
	}
}

impl fmt::Display for Alarm {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "alarm {}", self.index())
	}
}

/// Which fields have to match the current time for the alarm to fire.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum AlarmMode {
	// register pattern not in the datasheet table
	Unknown,
	// alarm 1 only
	PerSecond,
	// alarm 2 only
	PerMinute,
	// alarm 1 only
	SecondsMatch,
	MinutesMatch,
	HoursMatch,
	DateMatch,
	DayMatch,
	// date/day match with a zero date/day
	Off,
}

impl AlarmMode {
	pub fn is_supported_by(self, alarm: Alarm) -> bool {
		match self {
			AlarmMode::Unknown => false,
			AlarmMode::PerSecond | AlarmMode::SecondsMatch => alarm == Alarm::One,
			AlarmMode::PerMinute => alarm == Alarm::Two,
			_ => true,
		}
	}
}

/// Alarm setting; only the fields the mode matches on are meaningful.
///
/// `second` is always 0 for alarm 2.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AlarmSpec {
	pub mode: AlarmMode,
	pub second: u8,
	pub minute: u8,
	pub hour: u8,
	// day of month (1-31), DateMatch
	pub day: u8,
	// day of week (1-7), DayMatch
	pub weekday: u8,
}

impl AlarmSpec {
	fn with_mode(mode: AlarmMode) -> Self {
		AlarmSpec {
			mode,
			second: 0,
			minute: 0,
			hour: 0,
			day: 0,
			weekday: 0,
		}
	}

	pub fn unknown() -> Self {
		Self::with_mode(AlarmMode::Unknown)
	}

	pub fn off() -> Self {
		Self::with_mode(AlarmMode::Off)
	}

	pub fn per_second() -> Self {
		Self::with_mode(AlarmMode::PerSecond)
	}

	pub fn per_minute() -> Self {
		Self::with_mode(AlarmMode::PerMinute)
	}

	pub fn seconds_match(second: u8) -> Self {
		AlarmSpec {
			second,
			..Self::with_mode(AlarmMode::SecondsMatch)
		}
	}

	pub fn minutes_match(minute: u8, second: u8) -> Self {
		AlarmSpec {
			second,
			minute,
			..Self::with_mode(AlarmMode::MinutesMatch)
		}
	}

	pub fn hours_match(hour: u8, minute: u8, second: u8) -> Self {
		AlarmSpec {
			second,
			minute,
			hour,
			..Self::with_mode(AlarmMode::HoursMatch)
		}
	}

	pub fn date_match(day: u8, hour: u8, minute: u8, second: u8) -> Self {
		AlarmSpec {
			second,
			minute,
			hour,
			day,
			..Self::with_mode(AlarmMode::DateMatch)
		}
	}

	pub fn day_match(weekday: u8, hour: u8, minute: u8, second: u8) -> Self {
		AlarmSpec {
			second,
			minute,
			hour,
			weekday,
			..Self::with_mode(AlarmMode::DayMatch)
		}
	}

	/// check the fields `alarm` would write for this mode
	pub fn validate(&self, alarm: Alarm) -> crate::AResult<()> {
		let (seconds, minutes, hours) = match self.mode {
			AlarmMode::SecondsMatch => (true, false, false),
			AlarmMode::MinutesMatch => (true, true, false),
			AlarmMode::HoursMatch | AlarmMode::DateMatch | AlarmMode::DayMatch => (true, true, true),
			_ => return Ok(()),
		};
		if seconds && alarm == Alarm::One && self.second > 59 {
			return Err(RtcError::invalid_date_time(format!("alarm second {} out of range", self.second)));
		}
		if minutes && self.minute > 59 {
			return Err(RtcError::invalid_date_time(format!("alarm minute {} out of range", self.minute)));
		}
		if hours && self.hour > 23 {
			return Err(RtcError::invalid_date_time(format!("alarm hour {} out of range", self.hour)));
		}
		if self.mode == AlarmMode::DateMatch && (self.day < 1 || self.day > 31) {
			return Err(RtcError::invalid_date_time(format!("alarm date {} out of range", self.day)));
		}
		if self.mode == AlarmMode::DayMatch && (self.weekday < 1 || self.weekday > 7) {
			return Err(RtcError::invalid_date_time(format!("alarm weekday {} out of range", self.weekday)));
		}
		Ok(())
	}
}
