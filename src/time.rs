//! Calendar date/time as stored by the clock.
//!
//! The epoch conversions are what the driver needs from a calendar library;
//! the only place the driver itself uses them is to derive the day of week
//! when a caller leaves it unset.

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;

use chrono::{
	DateTime,
	Datelike,
	NaiveDate,
	NaiveDateTime,
	Timelike,
};

use crate::RtcError;

/// Broken-down date and time.
///
/// `hour` is always 0-23. `weekday` is 1-7 with 1 = Sunday; 0 means "not
/// set" and gets derived from the date when written to the chip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CalendarTime {
	pub second: u8,
	pub minute: u8,
	pub hour: u8,
	pub weekday: u8,
	pub day: u8,
	pub month: u8,
	pub year: u16,
}

impl CalendarTime {
	pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
		CalendarTime {
			second,
			minute,
			hour,
			weekday: 0,
			day,
			month,
			year,
		}
	}

	pub fn has_valid_weekday(&self) -> bool {
		self.weekday >= 1 && self.weekday <= 7
	}

	pub fn validate_time(&self) -> crate::AResult<()> {
		if self.second > 59 || self.minute > 59 || self.hour > 23 {
			return Err(RtcError::invalid_date_time(format!(
				"time out of range: {:02}:{:02}:{:02}", self.hour, self.minute, self.second
			)));
		}
		Ok(())
	}

	pub fn validate_date(&self) -> crate::AResult<()> {
		if self.day < 1 || self.day > 31 || self.month < 1 || self.month > 12 {
			return Err(RtcError::invalid_date_time(format!(
				"date out of range: {:04}-{:02}-{:02}", self.year, self.month, self.day
			)));
		}
		Ok(())
	}

	pub fn to_naive(&self) -> crate::AResult<NaiveDateTime> {
		NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
			.and_then(|d| d.and_hms_opt(u32::from(self.hour), u32::from(self.minute), u32::from(self.second)))
			.ok_or_else(|| RtcError::invalid_date_time(format!("no such date/time: {}", self)))
	}

	pub fn from_naive(naive: &NaiveDateTime) -> crate::AResult<Self> {
		let year = u16::try_from(naive.year())
			.map_err(|_| RtcError::invalid_date_time(format!("year {} out of range", naive.year())))?;
		Ok(CalendarTime {
			second: naive.second() as u8,
			minute: naive.minute() as u8,
			hour: naive.hour() as u8,
			weekday: naive.weekday().number_from_sunday() as u8,
			day: naive.day() as u8,
			month: naive.month() as u8,
			year,
		})
	}

	/// seconds since 1970-01-01 00:00:00; `weekday` is ignored
	pub fn compose_epoch(&self) -> crate::AResult<i64> {
		Ok(self.to_naive()?.and_utc().timestamp())
	}

	pub fn decompose_epoch(epoch: i64) -> crate::AResult<Self> {
		let dt = DateTime::from_timestamp(epoch, 0)
			.ok_or_else(|| RtcError::invalid_date_time(format!("timestamp {} out of range", epoch)))?;
		Self::from_naive(&dt.naive_utc())
	}

	/// copy with `weekday` derived from the date if it isn't in 1-7
	pub fn with_derived_weekday(&self) -> crate::AResult<Self> {
		if self.has_valid_weekday() {
			return Ok(*self);
		}
		let derived = Self::decompose_epoch(self.compose_epoch()?)?;
		Ok(CalendarTime {
			weekday: derived.weekday,
			..*self
		})
	}
}

impl CalendarTime {
	// chronological; weekday only breaks ties between otherwise equal values
	fn sort_key(&self) -> (u16, u8, u8, u8, u8, u8, u8) {
		(self.year, self.month, self.day, self.hour, self.minute, self.second, self.weekday)
	}
}

impl PartialOrd for CalendarTime {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for CalendarTime {
	fn cmp(&self, other: &Self) -> Ordering {
		self.sort_key().cmp(&other.sort_key())
	}
}

impl fmt::Display for CalendarTime {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
			self.year,
			self.month,
			self.day,
			self.hour,
			self.minute,
			self.second,
		)
	}
}
