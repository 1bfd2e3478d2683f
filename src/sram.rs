use std::cmp;
use std::io;

use crate::bus::{
	Bus,
	RegisterExt,
};
use crate::ds3232::consts::{
	DS3232_ADDRESS,
	REG_MONTH,
	SRAM_BASE,
	SRAM_SIZE,
};
use crate::{
	END_OF_STREAM,
	RtcError,
};

/// Battery backed SRAM of a DS3232 as a byte stream.
///
/// The cursor addresses the 236 bytes from register 0x14 to 0xFF; it never
/// moves past the end of that window. The first access probes the chip
/// once; if it doesn't answer, every later read and write fails with
/// `RtcError::NotAvailable`.
pub struct Sram<B: Bus> {
	bus: B,
	address: u8,
	cursor: usize,
	present: Option<bool>,
}

impl<B: Bus> Sram<B> {
	pub fn new(bus: B) -> Self {
		Self::with_address(bus, DS3232_ADDRESS)
	}

	pub fn with_address(bus: B, address: u8) -> Self {
		Sram {
			bus,
			address,
			cursor: 0,
			present: None,
		}
	}

	pub fn bus(&mut self) -> &mut B {
		&mut self.bus
	}

	pub fn into_inner(self) -> B {
		self.bus
	}

	// probed once, the result sticks
	fn is_present(&mut self) -> bool {
		match self.present {
			Some(present) => present,
			None => {
				let present = self.bus.probe(self.address, REG_MONTH);
				if !present {
					warn!("SRAM: no device at I2C address 0x{:02x}", self.address);
				}
				self.present = Some(present);
				present
			},
		}
	}

	fn ensure_present(&mut self) -> crate::AResult<()> {
		if !self.is_present() {
			return Err(RtcError::NotAvailable.into());
		}
		Ok(())
	}

	fn remaining(&self) -> usize {
		SRAM_SIZE - self.cursor
	}

	// register for a window offset; offset must be inside the window
	fn register(offset: usize) -> u8 {
		debug_assert!(offset < SRAM_SIZE);
		SRAM_BASE + offset as u8
	}

	/// Bytes left behind the cursor, or -1 if the chip didn't answer the
	/// first probe.
	pub fn available(&mut self) -> i32 {
		if !self.is_present() {
			return END_OF_STREAM;
		}
		self.remaining() as i32
	}

	/// byte at the cursor; `None` at the end of the window
	pub fn peek_byte(&mut self) -> crate::AResult<Option<u8>> {
		self.ensure_present()?;
		if self.cursor >= SRAM_SIZE {
			return Ok(None);
		}
		let value = self.bus.read_register(self.address, Self::register(self.cursor))?;
		Ok(Some(value))
	}

	pub fn read_byte(&mut self) -> crate::AResult<Option<u8>> {
		let value = self.peek_byte()?;
		if value.is_some() {
			self.cursor += 1;
		}
		Ok(value)
	}

	/// `peek_byte` with -1 for "end of window" and "no answer"
	pub fn peek_or_end(&mut self) -> i32 {
		Self::or_end(self.peek_byte())
	}

	/// `read_byte` with -1 for "end of window" and "no answer"
	pub fn read_or_end(&mut self) -> i32 {
		Self::or_end(self.read_byte())
	}

	fn or_end(value: crate::AResult<Option<u8>>) -> i32 {
		match value {
			Ok(Some(v)) => i32::from(v),
			Ok(None) => END_OF_STREAM,
			Err(e) => {
				debug!("SRAM: read failed: {}", e);
				END_OF_STREAM
			},
		}
	}

	/// Read up to the end of the window in one transfer; returns the number
	/// of bytes read.
	pub fn read_bytes(&mut self, target: &mut [u8]) -> crate::AResult<usize> {
		self.ensure_present()?;
		let count = cmp::min(target.len(), self.remaining());
		if 0 == count {
			return Ok(0);
		}
		self.bus.read_registers(self.address, Self::register(self.cursor), &mut target[..count])?;
		self.cursor += count;
		Ok(count)
	}

	/// Write as much of `data` as fits in one transaction; returns the
	/// number of bytes written (0 once the window is full).
	pub fn write_bytes(&mut self, data: &[u8]) -> crate::AResult<usize> {
		self.ensure_present()?;
		let count = cmp::min(data.len(), self.remaining());
		if 0 == count {
			if !data.is_empty() {
				debug!("SRAM: full, dropping {} bytes", data.len());
			}
			return Ok(0);
		}
		let register = Self::register(self.cursor);
		let mut tx = self.bus.start_write(self.address);
		tx.write_byte(register);
		tx.write(&data[..count]);
		tx.finish()?;
		self.cursor += count;
		Ok(count)
	}

	pub fn write_byte(&mut self, data: u8) -> crate::AResult<usize> {
		self.write_bytes(&[data])
	}

	pub fn write_str(&mut self, data: &str) -> crate::AResult<usize> {
		self.write_bytes(data.as_bytes())
	}

	/// Move the cursor to `pos` if it is inside the window (0-235), else
	/// leave it; returns the cursor.
	pub fn seek(&mut self, pos: usize) -> usize {
		if pos < SRAM_SIZE {
			self.cursor = pos;
		} else {
			debug!("SRAM: seek to {} outside window ignored", pos);
		}
		self.cursor
	}

	/// Reset the cursor to the start of the window.
	///
	/// Writes are never buffered; this doesn't commit anything.
	pub fn flush(&mut self) {
		self.cursor = 0;
	}

	pub fn tell(&self) -> usize {
		self.cursor
	}

	/// Random access read; 0 for offsets outside the window. The cursor
	/// doesn't move.
	pub fn read_at(&mut self, offset: usize) -> crate::AResult<u8> {
		if offset >= SRAM_SIZE {
			debug!("SRAM: read at {} outside window", offset);
			return Ok(0);
		}
		self.ensure_present()?;
		self.bus.read_register(self.address, Self::register(offset))
	}

	/// Random access write; ignored for offsets outside the window. The
	/// cursor doesn't move.
	pub fn write_at(&mut self, offset: usize, value: u8) -> crate::AResult<()> {
		if offset >= SRAM_SIZE {
			debug!("SRAM: write at {} outside window ignored", offset);
			return Ok(());
		}
		self.ensure_present()?;
		self.bus.write_register(self.address, Self::register(offset), value)
	}
}

fn to_io_error(e: failure::Error) -> io::Error {
	io::Error::new(io::ErrorKind::Other, format!("{}", e))
}

impl<B: Bus> io::Read for Sram<B> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.read_bytes(buf).map_err(to_io_error)
	}
}

impl<B: Bus> io::Write for Sram<B> {
	fn write(&mut self, data: &[u8]) -> io::Result<usize> {
		self.write_bytes(data).map_err(to_io_error)
	}

	// nothing buffered; the cursor stays where it is
	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Positions up to and including the end of the window are valid.
impl<B: Bus> io::Seek for Sram<B> {
	fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
		let target = match pos {
			io::SeekFrom::Start(n) => n as i128,
			io::SeekFrom::End(d) => SRAM_SIZE as i128 + i128::from(d),
			io::SeekFrom::Current(d) => self.cursor as i128 + i128::from(d),
		};
		if target < 0 || target > SRAM_SIZE as i128 {
			return Err(io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("SRAM position {} outside 0-{}", target, SRAM_SIZE),
			));
		}
		self.cursor = target as usize;
		Ok(self.cursor as u64)
	}
}

#[cfg(test)]
mod test {
	use std::io::{
		Read,
		Seek,
		SeekFrom,
		Write,
	};

	use super::*;
	use crate::bus::{
		Access,
		SimulatedBus,
	};
	use crate::{
		CalendarTime,
		Ds3232,
	};

	fn sram() -> Sram<SimulatedBus> {
		crate::init_test_logging();
		Sram::new(SimulatedBus::new())
	}

	#[test]
	fn hello() {
		let mut sram = sram();
		assert_eq!(sram.available(), 236);
		assert_eq!(sram.write_str("HELLO").unwrap(), 5);
		assert_eq!(sram.tell(), 5);
		assert_eq!(sram.available(), 231);
		assert_eq!(&sram.bus().registers()[0x14..0x19], b"HELLO");

		assert_eq!(sram.seek(0), 0);
		let mut read = Vec::new();
		for _ in 0..5 {
			read.push(sram.read_byte().unwrap().unwrap());
		}
		assert_eq!(read, b"HELLO");
		assert_eq!(sram.peek_or_end(), 0);
		assert_eq!(sram.tell(), 5);
	}

	#[test]
	fn single_transaction_per_write() {
		let mut sram = sram();
		sram.available();
		sram.bus().clear_accesses();
		sram.seek(3);
		sram.write_bytes(&[1, 2, 3]).unwrap();
		assert_eq!(sram.bus().accesses(), &[Access::Write {
			address: DS3232_ADDRESS,
			data: vec![0x17, 1, 2, 3],
		}]);
	}

	#[test]
	fn capacity_boundary() {
		let mut sram = sram();
		assert_eq!(sram.seek(230), 230);
		assert_eq!(sram.write_bytes(&[0xaa; 10]).unwrap(), 6);
		assert_eq!(sram.tell(), SRAM_SIZE);
		assert_eq!(sram.available(), 0);
		assert_eq!(&sram.bus().registers()[0xfa..], &[0xaa; 6]);
		// register pointer wraps on the chip; nothing must land there
		assert_eq!(sram.bus().register(0x00), 0);

		assert_eq!(sram.write_byte(1).unwrap(), 0);
		assert_eq!(sram.read_byte().unwrap(), None);
		assert_eq!(sram.read_or_end(), END_OF_STREAM);
		assert_eq!(sram.read_bytes(&mut [0u8; 4]).unwrap(), 0);
		assert_eq!(sram.tell(), SRAM_SIZE);
	}

	#[test]
	fn seek_bounds() {
		let mut sram = sram();
		assert_eq!(sram.seek(10), 10);
		assert_eq!(sram.seek(235), 235);
		assert_eq!(sram.seek(236), 235);
		assert_eq!(sram.seek(1000), 235);
		sram.flush();
		assert_eq!(sram.tell(), 0);
	}

	#[test]
	fn random_access() {
		let mut sram = sram();
		sram.seek(7);
		sram.write_at(235, 0x42).unwrap();
		assert_eq!(sram.bus().register(0xff), 0x42);
		assert_eq!(sram.read_at(235).unwrap(), 0x42);
		assert_eq!(sram.tell(), 7);

		sram.bus().clear_accesses();
		sram.write_at(236, 0x01).unwrap();
		assert_eq!(sram.read_at(500).unwrap(), 0);
		assert!(sram.bus().accesses().is_empty());
	}

	#[test]
	fn dead_bus() {
		let mut sram = sram();
		sram.bus().set_present(false);
		assert_eq!(sram.available(), -1);
		assert_eq!(sram.read_or_end(), END_OF_STREAM);
		assert_eq!(sram.tell(), 0);
		let e = sram.read_byte().unwrap_err();
		assert!(crate::is_not_available(&e), "unexpected error: {}", e);
		assert!(sram.write_str("x").is_err());
		assert!(sram.read_at(0).is_err());

		// the probe result is kept, for reads as well as writes
		sram.bus().set_present(true);
		sram.bus().set_register(SRAM_BASE, b'A');
		sram.bus().clear_accesses();
		assert_eq!(sram.available(), -1);
		assert_eq!(sram.read_or_end(), END_OF_STREAM);
		assert_eq!(sram.peek_or_end(), END_OF_STREAM);
		let e = sram.read_bytes(&mut [0u8; 4]).unwrap_err();
		assert!(crate::is_not_available(&e), "unexpected error: {}", e);
		assert!(sram.read_at(0).is_err());
		assert!(sram.write_at(0, 1).is_err());
		assert!(sram.write_str("x").is_err());
		assert_eq!(sram.tell(), 0);
		assert!(sram.bus().accesses().is_empty());
	}

	#[test]
	fn io_traits() {
		let mut sram = sram();
		sram.write_all(b"abc").unwrap();
		Write::flush(&mut sram).unwrap();
		assert_eq!(sram.tell(), 3);

		assert_eq!(Seek::seek(&mut sram, SeekFrom::Start(0)).unwrap(), 0);
		let mut buf = [0u8; 3];
		sram.read_exact(&mut buf).unwrap();
		assert_eq!(&buf, b"abc");

		assert_eq!(Seek::seek(&mut sram, SeekFrom::End(0)).unwrap(), 236);
		assert_eq!(Seek::seek(&mut sram, SeekFrom::Current(-1)).unwrap(), 235);
		let e = Seek::seek(&mut sram, SeekFrom::End(1)).unwrap_err();
		assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
		assert_eq!(sram.tell(), 235);

		let e = sram.write_all(b"xy").unwrap_err();
		assert_eq!(e.kind(), io::ErrorKind::WriteZero);

		let mut rest = Vec::new();
		Seek::seek(&mut sram, SeekFrom::Start(230)).unwrap();
		sram.read_to_end(&mut rest).unwrap();
		assert_eq!(rest.len(), 6);
		assert_eq!(rest[5], b'x');
	}

	#[test]
	fn shared_bus() {
		crate::init_test_logging();
		let mut bus = SimulatedBus::new();
		{
			let mut rtc = Ds3232::new(&mut bus);
			rtc.write_date_time(&CalendarTime::new(2030, 1, 2, 3, 4, 5)).unwrap();
		}
		{
			let mut sram = Sram::new(&mut bus);
			sram.write_str("boot").unwrap();
		}
		assert_eq!(&bus.registers()[0x04..0x07], &[0x02, 0x01, 0x30]);
		assert_eq!(&bus.registers()[0x14..0x18], b"boot");
	}
}
