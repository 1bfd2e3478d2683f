/* Chip documentation: https://www.analog.com/en/products/ds3232.html (datasheet pages 11-14) */

use crate::bus::{
	Bus,
	RegisterExt,
};
use crate::time::CalendarTime;

pub mod alarm;
pub mod codec;
mod registers;
mod temperature;

pub use self::alarm::{
	Alarm,
	AlarmMode,
	AlarmSpec,
};

pub use self::registers::{
	Control,
	SqiMode,
	Status,
	TempScanRate,
};

pub use self::temperature::{
	Temperature,
	celsius_to_fahrenheit,
	fahrenheit_to_celsius,
};

pub mod consts {
	pub const DS3232_ADDRESS: u8 = 0x68;

	// year 0 in the year register (without century flag)
	pub const YEAR_BASE: u16 = 2000;

	// registers
	pub const REG_SECONDS: u8 = 0x00;
	pub const REG_MINUTES: u8 = 0x01;
	pub const REG_HOURS: u8 = 0x02;
	pub const REG_WEEKDAY: u8 = 0x03;
	pub const REG_DATE: u8 = 0x04;
	pub const REG_MONTH: u8 = 0x05; // MSB: century
	pub const REG_YEAR: u8 = 0x06;
	pub const REG_ALARM1: u8 = 0x07; // seconds, minutes, hours, day/date
	pub const REG_ALARM2: u8 = 0x0B; // minutes, hours, day/date
	pub const REG_CONTROL: u8 = 0x0E;
	pub const REG_STATUS: u8 = 0x0F;
	pub const REG_TEMPERATURE_MSB: u8 = 0x11;
	pub const REG_TEMPERATURE_LSB: u8 = 0x12;

	// battery backed SRAM, up to the end of the register space
	pub const SRAM_BASE: u8 = 0x14;
	pub const SRAM_SIZE: usize = 0x100 - SRAM_BASE as usize;

	// field bits
	pub const HOUR_12H: u8 = 0x40;
	pub const HOUR_PM: u8 = 0x20;
	pub const MONTH_CENTURY: u8 = 0x80;
	pub const ALARM_MASK: u8 = 0x80; // "AxMy": ignore field
	pub const ALARM_DAY_OF_WEEK: u8 = 0x40; // "DY/DT"

	// control register
	pub const CONTROL_EOSC: u8 = 0x80;
	pub const CONTROL_BBSQW: u8 = 0x40;
	pub const CONTROL_CONV: u8 = 0x20;
	pub const CONTROL_RS2: u8 = 0x10;
	pub const CONTROL_RS1: u8 = 0x08;
	pub const CONTROL_INTCN: u8 = 0x04;
	pub const CONTROL_A2IE: u8 = 0x02;
	pub const CONTROL_A1IE: u8 = 0x01;

	pub const CONTROL_RS_1HZ: u8 = 0x00;
	pub const CONTROL_RS_1024HZ: u8 = 0x08;
	pub const CONTROL_RS_4096HZ: u8 = 0x10;
	pub const CONTROL_RS_8192HZ: u8 = 0x18;

	// control/status register
	pub const STATUS_OSF: u8 = 0x80;
	pub const STATUS_BB33KHZ: u8 = 0x40;
	pub const STATUS_CRATE1: u8 = 0x20;
	pub const STATUS_CRATE0: u8 = 0x10;
	pub const STATUS_EN33KHZ: u8 = 0x08;
	pub const STATUS_BSY: u8 = 0x04; // read only
	pub const STATUS_A2F: u8 = 0x02;
	pub const STATUS_A1F: u8 = 0x01;

	pub const STATUS_CRATE_MASK: u8 = STATUS_CRATE1 | STATUS_CRATE0;
	pub const STATUS_CRATE_64: u8 = 0x00;
	pub const STATUS_CRATE_128: u8 = 0x10;
	pub const STATUS_CRATE_256: u8 = 0x20;
	pub const STATUS_CRATE_512: u8 = 0x30;
}

use self::consts::*;

/// Clock part of a DS3232 (timekeeping, alarms, control, temperature).
///
/// Holds no state besides the bus; every call talks to the chip. Register
/// updates are read-modify-write sequences, so concurrent users of the
/// same chip need to lock around the whole device.
pub struct Ds3232<B: Bus> {
	bus: B,
	address: u8,
	infer_alarm_off: bool,
}

impl<B: Bus> Ds3232<B> {
	pub fn new(bus: B) -> Self {
		Self::with_address(bus, DS3232_ADDRESS)
	}

	pub fn with_address(bus: B, address: u8) -> Self {
		Ds3232 {
			bus,
			address,
			infer_alarm_off: true,
		}
	}

	pub fn address(&self) -> u8 {
		self.address
	}

	pub fn bus(&mut self) -> &mut B {
		&mut self.bus
	}

	pub fn into_inner(self) -> B {
		self.bus
	}

	/// Report date/day alarms with a zero date/day as `AlarmMode::Off`
	/// (default: enabled). The chip documentation doesn't cover this case.
	pub fn set_infer_alarm_off(&mut self, enable: bool) {
		self.infer_alarm_off = enable;
	}

	/// harmless read of the month register
	pub fn probe_available(&mut self) -> bool {
		self.bus.probe(self.address, REG_MONTH)
	}

	pub fn read_date_time(&mut self) -> crate::AResult<CalendarTime> {
		let mut data = [0u8; 7];
		self.bus.read_registers(self.address, REG_SECONDS, &mut data)?;
		let tm = codec::decode_date_time(&data, YEAR_BASE);
		debug!("DS3232: read {} (weekday {})", tm, tm.weekday);
		Ok(tm)
	}

	/// seconds since the epoch
	pub fn get(&mut self) -> crate::AResult<i64> {
		self.read_date_time()?.compose_epoch()
	}

	pub fn set(&mut self, epoch: i64) -> crate::AResult<()> {
		let tm = CalendarTime::decompose_epoch(epoch)?;
		self.write_date_time(&tm)
	}

	/// Write time and date, then clear the oscillator stop flag: a freshly
	/// set clock is valid.
	///
	/// A `weekday` outside 1-7 is derived from the date.
	pub fn write_date_time(&mut self, tm: &CalendarTime) -> crate::AResult<()> {
		let tm = tm.with_derived_weekday()?;
		let time = codec::encode_time(&tm)?;
		let date = codec::encode_date(&tm, YEAR_BASE)?;
		debug!("DS3232: write {} (weekday {})", tm, tm.weekday);
		{
			let mut tx = self.bus.start_write(self.address);
			tx.write_byte(REG_SECONDS);
			tx.write(&time);
			tx.write(&date);
			tx.finish()?;
		}
		self.set_oscillator_stop_flag(false)
	}

	/// Write seconds, minutes and hours only; the oscillator stop flag is
	/// left alone.
	pub fn write_time_only(&mut self, tm: &CalendarTime) -> crate::AResult<()> {
		let time = codec::encode_time(tm)?;
		self.bus.write_registers(self.address, REG_SECONDS, &time)
	}

	/// Write weekday, date, month and year only; the oscillator stop flag
	/// is left alone. A `weekday` outside 1-7 is derived from the date.
	pub fn write_date_only(&mut self, tm: &CalendarTime) -> crate::AResult<()> {
		let tm = tm.with_derived_weekday()?;
		let date = codec::encode_date(&tm, YEAR_BASE)?;
		self.bus.write_registers(self.address, REG_WEEKDAY, &date)
	}

	/// Alarm index other than 1 or 2 returns an `Unknown` alarm without
	/// touching the bus.
	pub fn read_alarm(&mut self, alarm: u8) -> crate::AResult<AlarmSpec> {
		let alarm = match Alarm::from_index(alarm) {
			Some(a) => a,
			None => {
				debug!("DS3232: no alarm {}", alarm);
				return Ok(AlarmSpec::unknown());
			},
		};
		let mut data = [0u8; 4];
		// alarm 2 has no seconds; keep data[0] zero
		let start = 4 - alarm.register_count();
		self.bus.read_registers(self.address, alarm.register(), &mut data[start..])?;
		let spec = codec::decode_alarm(alarm, &data, self.infer_alarm_off);
		debug!("DS3232: {} registers {:02x?}: {:?}", alarm, &data[start..], spec);
		Ok(spec)
	}

	/// Program an alarm. Invalid alarm index, `AlarmMode::Unknown` and
	/// modes the alarm can't do are ignored.
	pub fn write_alarm(&mut self, alarm: u8, spec: &AlarmSpec) -> crate::AResult<()> {
		let alarm = match Alarm::from_index(alarm) {
			Some(a) => a,
			None => {
				debug!("DS3232: no alarm {}, not writing {:?}", alarm, spec);
				return Ok(());
			},
		};
		let data = match codec::encode_alarm(alarm, spec)? {
			Some(data) => data,
			None => {
				if spec.mode != AlarmMode::Unknown {
					warn!("DS3232: {} doesn't support {:?}, not written", alarm, spec.mode);
				}
				return Ok(());
			},
		};
		let start = 4 - alarm.register_count();
		self.bus.write_registers(self.address, alarm.register(), &data[start..])
	}

	pub fn control(&mut self) -> crate::AResult<Control> {
		Ok(Control(self.bus.read_register(self.address, REG_CONTROL)?))
	}

	pub fn status(&mut self) -> crate::AResult<Status> {
		Ok(Status(self.bus.read_register(self.address, REG_STATUS)?))
	}

	fn update_control<F: FnOnce(&mut Control)>(&mut self, f: F) -> crate::AResult<()> {
		self.bus.update_register(self.address, REG_CONTROL, |v| {
			let mut c = Control(v);
			f(&mut c);
			c.0
		})?;
		Ok(())
	}

	fn update_status<F: FnOnce(&mut Status)>(&mut self, f: F) -> crate::AResult<()> {
		self.bus.update_register(self.address, REG_STATUS, |v| {
			let mut s = Status(v);
			f(&mut s);
			s.0
		})?;
		Ok(())
	}

	/// Keep the oscillator running on battery (it always runs on Vcc).
	pub fn set_bb_oscillator(&mut self, enable: bool) -> crate::AResult<()> {
		self.update_control(|c| { c.set_bb_oscillator(enable); })
	}

	/// Keep the square wave running on battery.
	pub fn set_bb_square_wave(&mut self, enable: bool) -> crate::AResult<()> {
		self.update_control(|c| { c.set_bb_square_wave(enable); })
	}

	pub fn set_sqi_mode(&mut self, mode: SqiMode) -> crate::AResult<()> {
		self.update_control(|c| { c.set_sqi_mode(mode); })
	}

	/// false for an alarm index other than 1 or 2
	pub fn is_alarm_interrupt(&mut self, alarm: u8) -> crate::AResult<bool> {
		match Alarm::from_index(alarm) {
			Some(a) => Ok(self.control()?.is_alarm_interrupt(a)),
			None => Ok(false),
		}
	}

	pub fn is_oscillator_stop_flag(&mut self) -> crate::AResult<bool> {
		Ok(self.status()?.is_oscillator_stop_flag())
	}

	pub fn set_oscillator_stop_flag(&mut self, enable: bool) -> crate::AResult<()> {
		self.update_status(|s| { s.set_oscillator_stop_flag(enable); })
	}

	pub fn set_bb_33khz_output(&mut self, enable: bool) -> crate::AResult<()> {
		self.update_status(|s| { s.set_bb_33khz_output(enable); })
	}

	pub fn set_tcxo_rate(&mut self, rate: TempScanRate) -> crate::AResult<()> {
		self.update_status(|s| { s.set_tcxo_rate(rate); })
	}

	pub fn set_33khz_output(&mut self, enable: bool) -> crate::AResult<()> {
		self.update_status(|s| { s.set_33khz_output(enable); })
	}

	pub fn is_tcxo_busy(&mut self) -> crate::AResult<bool> {
		Ok(self.status()?.is_tcxo_busy())
	}

	/// false for an alarm index other than 1 or 2
	pub fn is_alarm_flag(&mut self, alarm: u8) -> crate::AResult<bool> {
		match Alarm::from_index(alarm) {
			Some(a) => Ok(self.status()?.is_alarm_flag(a)),
			None => Ok(false),
		}
	}

	/// triggered alarms: A1F = 0x01, A2F = 0x02
	pub fn alarm_flags(&mut self) -> crate::AResult<u8> {
		Ok(self.status()?.alarm_flags())
	}

	/// Clear the alarm flags in `mask` (A1F = 0x01, A2F = 0x02); nothing
	/// happens if `mask` contains neither.
	pub fn clear_alarm_flag(&mut self, mask: u8) -> crate::AResult<()> {
		if 0 == mask & (STATUS_A1F | STATUS_A2F) {
			return Ok(());
		}
		self.update_status(|s| { s.clear_alarm_flags(mask); })
	}

	pub fn read_temperature(&mut self) -> crate::AResult<Temperature> {
		let mut data = [0u8; 2];
		self.bus.read_registers(self.address, REG_TEMPERATURE_MSB, &mut data)?;
		Ok(Temperature::from_registers(data[0], data[1]))
	}
}

/// Attach to a DS3232 and make sure it answers.
pub fn open_ds3232<B: Bus>(bus: B) -> crate::AResult<Ds3232<B>> {
	let mut rtc = Ds3232::new(bus);
	ensure!(rtc.probe_available(), "No DS3232 responding at I2C address 0x{:02x}", rtc.address());
	if rtc.is_oscillator_stop_flag()? {
		warn!("DS3232: oscillator was stopped, time is not valid");
	}
	Ok(rtc)
}
