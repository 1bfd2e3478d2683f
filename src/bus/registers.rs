use crate::RtcError;

use super::Bus;

/// Register-level access on top of raw bus transactions.
pub trait RegisterExt: Bus {
	// set the register pointer for a following read
	fn select_register(&mut self, address: u8, register: u8) -> crate::AResult<()> {
		let mut tx = self.start_write(address);
		tx.write_byte(register);
		tx.finish()
	}

	/// fill `target` with consecutive registers starting at `register`
	///
	/// Fails with [`RtcError::NotAvailable`] if the device doesn't deliver
	/// all requested bytes; `target` may be partially overwritten then.
	fn read_registers(&mut self, address: u8, register: u8, target: &mut [u8]) -> crate::AResult<()> {
		self.select_register(address, register)?;
		let received = self.request_read(address, target.len());
		trace!("I2C 0x{:02x}: read {} of {} bytes at 0x{:02x}", address, received, target.len(), register);
		for t in target.iter_mut() {
			if !self.byte_available() {
				return Err(RtcError::NotAvailable.into());
			}
			*t = self.read_byte();
		}
		Ok(())
	}

	fn read_register(&mut self, address: u8, register: u8) -> crate::AResult<u8> {
		let mut buf = [0u8];
		self.read_registers(address, register, &mut buf)?;
		Ok(buf[0])
	}

	fn write_registers(&mut self, address: u8, register: u8, data: &[u8]) -> crate::AResult<()> {
		let mut tx = self.start_write(address);
		tx.write_byte(register);
		tx.write(data);
		tx.finish()
	}

	fn write_register(&mut self, address: u8, register: u8, data: u8) -> crate::AResult<()> {
		self.write_registers(address, register, &[data])
	}

	/// read-modify-write a single register; nothing is written if the read
	/// fails
	///
	/// Not atomic: another bus user could modify the register in between.
	fn update_register<F>(&mut self, address: u8, register: u8, f: F) -> crate::AResult<u8>
	where
		F: FnOnce(u8) -> u8,
	{
		let old = self.read_register(address, register)?;
		let new = f(old);
		debug!("I2C 0x{:02x}: register 0x{:02x}: 0x{:02x} -> 0x{:02x}", address, register, old, new);
		self.write_register(address, register, new)?;
		Ok(new)
	}

	/// harmless single byte read of `register`; true if the device answered
	fn probe(&mut self, address: u8, register: u8) -> bool {
		match self.read_register(address, register) {
			Ok(_) => true,
			Err(e) => {
				debug!("I2C 0x{:02x}: probe failed: {}", address, e);
				false
			},
		}
	}
}

impl<B: Bus + ?Sized> RegisterExt for B {
}
