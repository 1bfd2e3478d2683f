//! Conversion between DS3232 register bytes and calendar / alarm values.
//!
//! Timekeeping registers (0x00-0x06):
//! - seconds, minutes: BCD, bit 7 unused
//! - hours: bit 6 selects 12-hour mode; then bit 5 is PM and bits 0-4 hold
//!   1-12 (BCD). Otherwise bits 0-5 hold 0-23 (BCD).
//! - weekday: 1-7 in bits 0-2
//! - date: BCD 1-31
//! - month: BCD 1-12 in bits 0-4, bit 7 is the century flag
//! - year: BCD 0-99
//!
//! Alarm registers (alarm 1: 0x07-0x0A seconds/minutes/hours/day, alarm 2:
//! 0x0B-0x0D without seconds) use the same field encodings, but bit 7 of
//! each byte is a mask bit ("AxMy": field is don't care) and bit 6 of the
//! day byte selects day-of-week instead of date-of-month.

use super::alarm::{
	Alarm,
	AlarmMode,
	AlarmSpec,
};
use super::consts::*;
use crate::time::CalendarTime;
use crate::RtcError;

pub fn dec_to_bcd(num: u8) -> u8 {
	assert!(num < 100, "BCD only encodes 0-99, got {}", num);
	(num / 10 * 16) + (num % 10)
}

// nibbles are taken as they are: 0x1a decodes to 20
pub fn bcd_to_dec(num: u8) -> u8 {
	(num / 16 * 10) + (num % 16)
}

/// hour register (or alarm hour byte) to 0-23
pub fn decode_hour(data: u8) -> u8 {
	if 0 != data & HOUR_12H {
		// 12 AM is midnight, 12 PM is noon
		let hour = bcd_to_dec(data & 0x1f) % 12;
		if 0 != data & HOUR_PM {
			hour + 12
		} else {
			hour
		}
	} else {
		bcd_to_dec(data & 0x3f)
	}
}

/// always writes 24-hour mode
pub fn encode_hour(hour: u8) -> u8 {
	assert!(hour < 24);
	dec_to_bcd(hour)
}

/// returns (month, year); `year_base` is the year the chip's year 0 stands for
pub fn decode_month_year(month_data: u8, year_data: u8, year_base: u16) -> (u8, u16) {
	let month = bcd_to_dec(month_data & 0x1f);
	let mut year = u16::from(bcd_to_dec(year_data));
	if 0 != month_data & MONTH_CENTURY {
		year += 100;
	}
	(month, year_base + year)
}

/// returns (month register, year register)
pub fn encode_month_year(month: u8, year: u16, year_base: u16) -> crate::AResult<(u8, u8)> {
	if month < 1 || month > 12 {
		return Err(RtcError::invalid_date_time(format!("month {} out of range", month)));
	}
	if year < year_base || year - year_base > 199 {
		return Err(RtcError::invalid_date_time(format!(
			"year {} can't be stored (range {}-{})", year, year_base, year_base + 199
		)));
	}
	let mut y = year - year_base;
	let mut m = dec_to_bcd(month);
	if y > 99 {
		m |= MONTH_CENTURY;
		y -= 100;
	}
	Ok((m, dec_to_bcd(y as u8)))
}

/// decode the 7 timekeeping registers
pub fn decode_date_time(data: &[u8; 7], year_base: u16) -> CalendarTime {
	let (month, year) = decode_month_year(data[5], data[6], year_base);
	CalendarTime {
		second: bcd_to_dec(data[0] & 0x7f),
		minute: bcd_to_dec(data[1] & 0x7f),
		hour: decode_hour(data[2] & 0x7f),
		weekday: bcd_to_dec(data[3] & 0x07),
		day: bcd_to_dec(data[4] & 0x3f),
		month,
		year,
	}
}

/// seconds, minutes, hours registers
pub fn encode_time(tm: &CalendarTime) -> crate::AResult<[u8; 3]> {
	tm.validate_time()?;
	Ok([
		dec_to_bcd(tm.second),
		dec_to_bcd(tm.minute),
		encode_hour(tm.hour),
	])
}

/// weekday, date, month, year registers; `tm.weekday` must already be valid
pub fn encode_date(tm: &CalendarTime, year_base: u16) -> crate::AResult<[u8; 4]> {
	tm.validate_date()?;
	if !tm.has_valid_weekday() {
		return Err(RtcError::invalid_date_time(format!("weekday {} out of range", tm.weekday)));
	}
	let (month, year) = encode_month_year(tm.month, tm.year, year_base)?;
	Ok([tm.weekday, dec_to_bcd(tm.day), month, year])
}

/// collect the mask bits of the alarm bytes: bit N is the mask bit of
/// byte N; if none is set bit 4 is the day-of-week selector instead.
pub fn alarm_flags(data: &[u8; 4]) -> u8 {
	let flags = ((data[0] & ALARM_MASK) >> 7)
		| ((data[1] & ALARM_MASK) >> 6)
		| ((data[2] & ALARM_MASK) >> 5)
		| ((data[3] & ALARM_MASK) >> 4);
	if 0 == flags {
		(data[3] & ALARM_DAY_OF_WEEK) >> 2
	} else {
		flags
	}
}

pub fn alarm_mode_from_flags(alarm: Alarm, flags: u8) -> AlarmMode {
	match flags {
		0b0_1111 => AlarmMode::PerSecond,
		0b0_1110 => match alarm {
			Alarm::One => AlarmMode::SecondsMatch,
			Alarm::Two => AlarmMode::PerMinute,
		},
		0b0_1100 => AlarmMode::MinutesMatch,
		0b0_1000 => AlarmMode::HoursMatch,
		0b0_0000 => AlarmMode::DateMatch,
		0b1_0000 => AlarmMode::DayMatch,
		_ => AlarmMode::Unknown,
	}
}

/// decode alarm registers; for alarm 2 `data[0]` must be 0 (no seconds)
///
/// With `infer_off` a date-of-month or day-of-week alarm with a zero
/// date/day is reported as `AlarmMode::Off`. The datasheet doesn't say what
/// the chip does with such a setting; the assumption is it never fires.
pub fn decode_alarm(alarm: Alarm, data: &[u8; 4], infer_off: bool) -> AlarmSpec {
	let mut mode = alarm_mode_from_flags(alarm, alarm_flags(data));
	let mut spec = AlarmSpec::unknown();

	let (seconds, minutes, hours, day) = match mode {
		AlarmMode::SecondsMatch => (true, false, false, false),
		AlarmMode::MinutesMatch => (true, true, false, false),
		AlarmMode::HoursMatch => (true, true, true, false),
		AlarmMode::DateMatch | AlarmMode::DayMatch => (true, true, true, true),
		_ => (false, false, false, false),
	};
	if seconds && alarm == Alarm::One {
		spec.second = bcd_to_dec(data[0] & 0x7f);
	}
	if minutes {
		spec.minute = bcd_to_dec(data[1] & 0x7f);
	}
	if hours {
		spec.hour = decode_hour(data[2] & 0x7f);
	}
	if day {
		if 0 == data[3] & ALARM_DAY_OF_WEEK {
			spec.day = bcd_to_dec(data[3] & 0x3f);
		} else {
			spec.weekday = bcd_to_dec(data[3] & 0x07);
		}
	}

	if infer_off {
		if (mode == AlarmMode::DateMatch && spec.day == 0) || (mode == AlarmMode::DayMatch && spec.weekday == 0) {
			mode = AlarmMode::Off;
		}
	}
	spec.mode = mode;
	spec
}

/// encode alarm registers; `None` if there is nothing to write (unknown
/// mode or a mode the alarm can't do). For alarm 2 `data[0]` isn't used.
pub fn encode_alarm(alarm: Alarm, spec: &AlarmSpec) -> crate::AResult<Option<[u8; 4]>> {
	if !spec.mode.is_supported_by(alarm) {
		return Ok(None);
	}
	spec.validate(alarm)?;

	let second = if alarm == Alarm::One { dec_to_bcd(spec.second) } else { 0x00 };
	let data = match spec.mode {
		AlarmMode::PerSecond => [ALARM_MASK, ALARM_MASK, ALARM_MASK, ALARM_MASK],
		AlarmMode::PerMinute => [0x00, ALARM_MASK, ALARM_MASK, ALARM_MASK],
		AlarmMode::SecondsMatch => [second, ALARM_MASK, ALARM_MASK, ALARM_MASK],
		AlarmMode::MinutesMatch => [second, dec_to_bcd(spec.minute), ALARM_MASK, ALARM_MASK],
		AlarmMode::HoursMatch => [second, dec_to_bcd(spec.minute), encode_hour(spec.hour), ALARM_MASK],
		AlarmMode::DateMatch => [second, dec_to_bcd(spec.minute), encode_hour(spec.hour), dec_to_bcd(spec.day)],
		AlarmMode::DayMatch => [
			second,
			dec_to_bcd(spec.minute),
			encode_hour(spec.hour),
			ALARM_DAY_OF_WEEK | dec_to_bcd(spec.weekday),
		],
		AlarmMode::Off => [0x00, 0x00, 0x00, 0x00],
		AlarmMode::Unknown => return Ok(None),
	};
	Ok(Some(data))
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn bcd() {
		for n in 0..100u8 {
			assert_eq!(bcd_to_dec(dec_to_bcd(n)), n, "BCD round trip failed for {}", n);
		}
		assert_eq!(dec_to_bcd(59), 0x59);
		assert_eq!(bcd_to_dec(0x42), 42);
	}

	#[test]
	fn hours() {
		for h in 0..24u8 {
			let data = encode_hour(h);
			assert_eq!(0, data & HOUR_12H, "hour {} not encoded in 24-hour mode", h);
			assert_eq!(decode_hour(data), h);
		}
	}

	#[test]
	fn twelve_hour_mode() {
		let check = |data: u8, hour: u8| {
			assert_eq!(decode_hour(data), hour, "hour register 0x{:02x}", data);
		};
		check(HOUR_12H | 0x12, 0); // 12 AM
		check(HOUR_12H | 0x01, 1);
		check(HOUR_12H | 0x11, 11);
		check(HOUR_12H | HOUR_PM | 0x12, 12); // 12 PM
		check(HOUR_12H | HOUR_PM | 0x01, 13);
		check(HOUR_12H | HOUR_PM | 0x11, 23);
	}

	#[test]
	fn century() {
		let check = |month: u8, year: u16, base: u16, century: bool| {
			let (m, y) = encode_month_year(month, year, base).unwrap();
			assert_eq!(century, 0 != m & MONTH_CENTURY, "century flag for {} (base {})", year, base);
			assert_eq!(decode_month_year(m, y, base), (month, year));
		};
		check(12, 1999, 1900, false);
		check(1, 2005, 1900, true);
		check(1, 2000, 2000, false);
		check(6, 2099, 2000, false);
		check(7, 2100, 2000, true);
		check(12, 2199, 2000, true);

		assert!(encode_month_year(1, 1999, 2000).is_err());
		assert!(encode_month_year(1, 2200, 2000).is_err());
		assert!(encode_month_year(0, 2020, 2000).is_err());
	}

	#[test]
	fn date_time_registers() {
		let data = [0x30, 0x45, 0x13, 0x06, 0x15, 0x83, 0x24];
		let tm = decode_date_time(&data, YEAR_BASE);
		assert_eq!(tm, CalendarTime {
			second: 30,
			minute: 45,
			hour: 13,
			weekday: 6,
			day: 15,
			month: 3,
			year: 2124,
		});
		assert_eq!(encode_time(&tm).unwrap(), [0x30, 0x45, 0x13]);
		assert_eq!(encode_date(&tm, YEAR_BASE).unwrap(), [0x06, 0x15, 0x83, 0x24]);
	}

	#[test]
	fn alarm_flag_table() {
		let check = |alarm: Alarm, data: [u8; 4], mode: AlarmMode| {
			assert_eq!(alarm_mode_from_flags(alarm, alarm_flags(&data)), mode, "alarm {:?} data {:02x?}", alarm, data);
		};
		check(Alarm::One, [0x80, 0x80, 0x80, 0x80], AlarmMode::PerSecond);
		check(Alarm::One, [0x00, 0x80, 0x80, 0x80], AlarmMode::SecondsMatch);
		check(Alarm::Two, [0x00, 0x80, 0x80, 0x80], AlarmMode::PerMinute);
		check(Alarm::One, [0x00, 0x00, 0x80, 0x80], AlarmMode::MinutesMatch);
		check(Alarm::Two, [0x00, 0x00, 0x00, 0x80], AlarmMode::HoursMatch);
		check(Alarm::One, [0x00, 0x00, 0x00, 0x01], AlarmMode::DateMatch);
		check(Alarm::Two, [0x00, 0x00, 0x00, 0x41], AlarmMode::DayMatch);
		check(Alarm::One, [0x80, 0x00, 0x80, 0x80], AlarmMode::Unknown);
		check(Alarm::One, [0x00, 0x80, 0x00, 0x00], AlarmMode::Unknown);
	}

	#[test]
	fn alarm_off_inference() {
		let date_zero = [0x00, 0x30, 0x07, 0x00];
		let day_zero = [0x00, 0x30, 0x07, 0x40];
		assert_eq!(decode_alarm(Alarm::One, &date_zero, true).mode, AlarmMode::Off);
		assert_eq!(decode_alarm(Alarm::Two, &day_zero, true).mode, AlarmMode::Off);
		assert_eq!(decode_alarm(Alarm::One, &date_zero, false).mode, AlarmMode::DateMatch);
		assert_eq!(decode_alarm(Alarm::Two, &day_zero, false).mode, AlarmMode::DayMatch);

		let spec = decode_alarm(Alarm::One, &[0x00, 0x30, 0x07, 0x09], true);
		assert_eq!(spec, AlarmSpec::date_match(9, 7, 30, 0));
	}

	#[test]
	fn alarm_twelve_hour_decode() {
		let spec = decode_alarm(Alarm::One, &[0x15, 0x30, HOUR_12H | HOUR_PM | 0x07, 0x80], true);
		assert_eq!(spec, AlarmSpec::hours_match(19, 30, 15));
	}

	#[test]
	fn alarm_unsupported_modes() {
		assert_eq!(encode_alarm(Alarm::Two, &AlarmSpec::per_second()).unwrap(), None);
		assert_eq!(encode_alarm(Alarm::Two, &AlarmSpec::seconds_match(5)).unwrap(), None);
		assert_eq!(encode_alarm(Alarm::One, &AlarmSpec::per_minute()).unwrap(), None);
		assert_eq!(encode_alarm(Alarm::One, &AlarmSpec::unknown()).unwrap(), None);
		assert!(encode_alarm(Alarm::One, &AlarmSpec::hours_match(24, 0, 0)).is_err());
	}

	#[test]
	fn alarm_fixed_patterns_ignore_fields() {
		let mut spec = AlarmSpec::per_second();
		spec.second = 12;
		spec.hour = 5;
		assert_eq!(encode_alarm(Alarm::One, &spec).unwrap(), Some([0x80, 0x80, 0x80, 0x80]));
		let mut spec = AlarmSpec::per_minute();
		spec.minute = 33;
		assert_eq!(encode_alarm(Alarm::Two, &spec).unwrap(), Some([0x00, 0x80, 0x80, 0x80]));
	}
}
