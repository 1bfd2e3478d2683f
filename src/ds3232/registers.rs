use std::fmt;

use super::alarm::Alarm;
use super::consts::*;

/// What the INT/SQW pin outputs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum SqiMode {
	None,
	SquareWave1Hz,
	SquareWave1024Hz,
	SquareWave4096Hz,
	SquareWave8192Hz,
	Alarm1,
	Alarm2,
	AlarmBoth,
}

impl SqiMode {
	// control register bits 4-0 for this mode
	fn bits(self) -> u8 {
		match self {
			SqiMode::None => CONTROL_INTCN,
			SqiMode::SquareWave1Hz => CONTROL_RS_1HZ,
			SqiMode::SquareWave1024Hz => CONTROL_RS_1024HZ,
			SqiMode::SquareWave4096Hz => CONTROL_RS_4096HZ,
			SqiMode::SquareWave8192Hz => CONTROL_RS_8192HZ,
			SqiMode::Alarm1 => CONTROL_INTCN | CONTROL_A1IE,
			SqiMode::Alarm2 => CONTROL_INTCN | CONTROL_A2IE,
			SqiMode::AlarmBoth => CONTROL_INTCN | CONTROL_A1IE | CONTROL_A2IE,
		}
	}
}

/// Interval of the temperature compensation conversions (on battery).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TempScanRate {
	Every64Seconds,
	Every128Seconds,
	Every256Seconds,
	Every512Seconds,
}

impl TempScanRate {
	fn bits(self) -> u8 {
		match self {
			TempScanRate::Every64Seconds => STATUS_CRATE_64,
			TempScanRate::Every128Seconds => STATUS_CRATE_128,
			TempScanRate::Every256Seconds => STATUS_CRATE_256,
			TempScanRate::Every512Seconds => STATUS_CRATE_512,
		}
	}

	fn from_bits(v: u8) -> Self {
		match v & STATUS_CRATE_MASK {
			STATUS_CRATE_64 => TempScanRate::Every64Seconds,
			STATUS_CRATE_128 => TempScanRate::Every128Seconds,
			STATUS_CRATE_256 => TempScanRate::Every256Seconds,
			STATUS_CRATE_512 => TempScanRate::Every512Seconds,
			_ => unreachable!(),
		}
	}
}

fn set_bit(value: &mut u8, mask: u8, enable: bool) {
	if enable {
		*value |= mask;
	} else {
		*value &= !mask;
	}
}

/// Control register (0x0E).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Control(pub u8);

impl Control {
	// EOSC is active low: set means the oscillator stops on battery
	pub fn is_bb_oscillator(&self) -> bool {
		0 == self.0 & CONTROL_EOSC
	}
	pub fn set_bb_oscillator(&mut self, enable: bool) -> &mut Self {
		set_bit(&mut self.0, CONTROL_EOSC, !enable);
		self
	}

	pub fn is_bb_square_wave(&self) -> bool {
		0 != self.0 & CONTROL_BBSQW
	}
	pub fn set_bb_square_wave(&mut self, enable: bool) -> &mut Self {
		set_bit(&mut self.0, CONTROL_BBSQW, enable);
		self
	}

	pub fn is_convert_temperature(&self) -> bool {
		0 != self.0 & CONTROL_CONV
	}

	pub fn is_interrupt_control(&self) -> bool {
		0 != self.0 & CONTROL_INTCN
	}

	/// keeps EOSC, BBSQW and CONV, replaces everything else
	pub fn set_sqi_mode(&mut self, mode: SqiMode) -> &mut Self {
		self.0 = (self.0 & (CONTROL_EOSC | CONTROL_BBSQW | CONTROL_CONV)) | mode.bits();
		self
	}

	/// the pin is in interrupt mode and the alarm's interrupt is enabled
	pub fn is_alarm_interrupt(&self, alarm: Alarm) -> bool {
		let mask = CONTROL_INTCN | alarm.interrupt_enable();
		mask == self.0 & mask
	}
}

impl fmt::Display for Control {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

impl fmt::Debug for Control {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x} (rate select: {}", self.0, (self.0 & (CONTROL_RS2 | CONTROL_RS1)) >> 3)?;
		if 0 != self.0 & CONTROL_EOSC { write!(f, " [EOSC]")?; }
		if self.is_bb_square_wave() { write!(f, " [BBSQW]")?; }
		if self.is_convert_temperature() { write!(f, " [CONV]")?; }
		if self.is_interrupt_control() { write!(f, " [INTCN]")?; }
		if 0 != self.0 & CONTROL_A2IE { write!(f, " [A2IE]")?; }
		if 0 != self.0 & CONTROL_A1IE { write!(f, " [A1IE]")?; }
		write!(f, ")")
	}
}

/// Control/status register (0x0F).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Status(pub u8);

impl Status {
	pub fn is_oscillator_stop_flag(&self) -> bool {
		0 != self.0 & STATUS_OSF
	}
	pub fn set_oscillator_stop_flag(&mut self, enable: bool) -> &mut Self {
		set_bit(&mut self.0, STATUS_OSF, enable);
		self
	}

	pub fn is_bb_33khz_output(&self) -> bool {
		0 != self.0 & STATUS_BB33KHZ
	}
	pub fn set_bb_33khz_output(&mut self, enable: bool) -> &mut Self {
		set_bit(&mut self.0, STATUS_BB33KHZ, enable);
		self
	}

	pub fn tcxo_rate(&self) -> TempScanRate {
		TempScanRate::from_bits(self.0)
	}
	pub fn set_tcxo_rate(&mut self, rate: TempScanRate) -> &mut Self {
		self.0 = (self.0 & !STATUS_CRATE_MASK) | rate.bits();
		self
	}

	pub fn is_33khz_output(&self) -> bool {
		0 != self.0 & STATUS_EN33KHZ
	}
	pub fn set_33khz_output(&mut self, enable: bool) -> &mut Self {
		set_bit(&mut self.0, STATUS_EN33KHZ, enable);
		self
	}

	// read only
	pub fn is_tcxo_busy(&self) -> bool {
		0 != self.0 & STATUS_BSY
	}

	pub fn alarm_flags(&self) -> u8 {
		self.0 & (STATUS_A1F | STATUS_A2F)
	}

	pub fn is_alarm_flag(&self, alarm: Alarm) -> bool {
		0 != self.0 & alarm.flag()
	}

	/// Flags in `mask` (A1F = 0x01, A2F = 0x02) get cleared; the other flag
	/// bits are written as 1, which leaves them untouched on the chip.
	pub fn clear_alarm_flags(&mut self, mask: u8) -> &mut Self {
		const FLAGS: u8 = STATUS_A1F | STATUS_A2F;
		self.0 = (self.0 & !FLAGS) | (!mask & FLAGS);
		self
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

impl fmt::Debug for Status {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x} (temperature rate: {:?}", self.0, self.tcxo_rate())?;
		if self.is_oscillator_stop_flag() { write!(f, " [OSF]")?; }
		if self.is_bb_33khz_output() { write!(f, " [BB33KHZ]")?; }
		if self.is_33khz_output() { write!(f, " [EN33KHZ]")?; }
		if self.is_tcxo_busy() { write!(f, " [BSY]")?; }
		if self.is_alarm_flag(Alarm::Two) { write!(f, " [A2F]")?; }
		if self.is_alarm_flag(Alarm::One) { write!(f, " [A1F]")?; }
		write!(f, ")")
	}
}
