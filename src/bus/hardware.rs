use std::ops::{
	Deref,
	DerefMut,
};

pub trait Bus {
	fn begin_transaction(&mut self, address: u8);

	// queue a byte for the current transaction; returns number of bytes queued
	fn write_byte(&mut self, data: u8) -> usize;

	// commit queued bytes; no-op if nothing was queued
	fn end_transaction(&mut self) -> crate::AResult<()>;

	// returns number of bytes received
	fn request_read(&mut self, address: u8, count: usize) -> usize;

	fn byte_available(&mut self) -> bool;

	// only meaningful while `byte_available()`
	fn read_byte(&mut self) -> u8;

	fn start_write(&mut self, address: u8) -> WriteTransaction<'_, Self> {
		trace!("I2C 0x{:02x}: begin write", address);
		self.begin_transaction(address);
		WriteTransaction {
			bus: self,
			address,
			queued: 0,
			finished: false,
		}
	}
}

impl<'a, B: ?Sized + Bus> Bus for &'a mut B {
	fn begin_transaction(&mut self, address: u8) {
		(**self).begin_transaction(address)
	}
	fn write_byte(&mut self, data: u8) -> usize {
		(**self).write_byte(data)
	}
	fn end_transaction(&mut self) -> crate::AResult<()> {
		(**self).end_transaction()
	}
	fn request_read(&mut self, address: u8, count: usize) -> usize {
		(**self).request_read(address, count)
	}
	fn byte_available(&mut self) -> bool {
		(**self).byte_available()
	}
	fn read_byte(&mut self) -> u8 {
		(**self).read_byte()
	}
}

/// Open write transaction.
///
/// `finish` commits and reports errors. A transaction dropped without
/// `finish` (e.g. on an early return) still commits the queued bytes; a
/// failure then only gets logged.
pub struct WriteTransaction<'a, B: ?Sized + Bus + 'a> {
	bus: &'a mut B,
	address: u8,
	queued: usize,
	finished: bool,
}

impl<'a, B: ?Sized + Bus> WriteTransaction<'a, B> {
	pub fn write_byte(&mut self, data: u8) -> usize {
		let n = self.bus.write_byte(data);
		self.queued += n;
		n
	}

	pub fn write(&mut self, data: &[u8]) -> usize {
		let mut n = 0;
		for b in data {
			n += self.write_byte(*b);
		}
		n
	}

	pub fn queued(&self) -> usize {
		self.queued
	}

	pub fn finish(mut self) -> crate::AResult<()> {
		self.finished = true;
		trace!("I2C 0x{:02x}: commit {} bytes", self.address, self.queued);
		self.bus.end_transaction()
	}
}

impl<'a, B: ?Sized + Bus> Drop for WriteTransaction<'a, B> {
	fn drop(&mut self) {
		if !self.finished {
			if let Err(e) = self.bus.end_transaction() {
				warn!("I2C 0x{:02x}: couldn't commit {} bytes: {}", self.address, self.queued, e);
			}
		}
	}
}

impl<'a, B: ?Sized + Bus> Deref for WriteTransaction<'a, B> {
	type Target = B;

	fn deref(&self) -> &Self::Target {
		&self.bus
	}
}

impl<'a, B: ?Sized + Bus> DerefMut for WriteTransaction<'a, B> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.bus
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::bus::{
		Access,
		SimulatedBus,
	};
	use crate::ds3232::consts::DS3232_ADDRESS;

	#[test]
	fn finish_commits() {
		let mut bus = SimulatedBus::new();
		{
			let mut tx = bus.start_write(DS3232_ADDRESS);
			tx.write_byte(0x20);
			assert_eq!(tx.write(&[1, 2]), 2);
			assert_eq!(tx.queued(), 3);
			tx.finish().unwrap();
		}
		assert_eq!(&bus.registers()[0x20..0x22], &[1, 2]);
		assert_eq!(bus.accesses().len(), 1);
	}

	#[test]
	fn drop_commits_unfinished() {
		let mut bus = SimulatedBus::new();
		{
			let mut tx = bus.start_write(DS3232_ADDRESS);
			tx.write_byte(0x30);
			tx.write(&[0xaa, 0xbb]);
		}
		assert_eq!(&bus.registers()[0x30..0x32], &[0xaa, 0xbb]);
		assert_eq!(bus.accesses(), &[Access::Write {
			address: DS3232_ADDRESS,
			data: vec![0x30, 0xaa, 0xbb],
		}]);
	}

	#[test]
	fn borrowed_bus() {
		let mut bus = SimulatedBus::new();
		{
			let mut borrowed: &mut SimulatedBus = &mut bus;
			let mut tx = Bus::start_write(&mut borrowed, DS3232_ADDRESS);
			tx.write(&[0x40, 7]);
			tx.finish().unwrap();
		}
		assert_eq!(bus.register(0x40), 7);
	}
}
