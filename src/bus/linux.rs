use std::collections::VecDeque;
use std::fs;
use std::io::{
	self,
	Read,
	Write,
};
use std::os::unix::io::AsRawFd;
use std::path::Path;

use super::Bus;
use crate::RtcError;

// from <linux/i2c-dev.h>
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// Bus on a Linux `/dev/i2c-N` character device.
///
/// Every committed write and every read request is a separate `write(2)`
/// / `read(2)` with a STOP condition in between; the DS3232 keeps its
/// register pointer across those.
pub struct I2cDev {
	file: fs::File,
	path: String,
	slave: Option<u8>,
	queued: Option<(u8, Vec<u8>)>,
	received: VecDeque<u8>,
}

impl I2cDev {
	pub fn path(&self) -> &str {
		&self.path
	}

	fn set_slave(&mut self, address: u8) -> io::Result<()> {
		if self.slave == Some(address) {
			return Ok(());
		}
		let r = unsafe {
			libc::ioctl(self.file.as_raw_fd(), I2C_SLAVE as _, address as libc::c_ulong)
		};
		if r < 0 {
			self.slave = None;
			return Err(io::Error::last_os_error());
		}
		self.slave = Some(address);
		Ok(())
	}

	fn read_exact_from(&mut self, address: u8, count: usize) -> io::Result<Vec<u8>> {
		self.set_slave(address)?;
		let mut buf = vec![0u8; count];
		// a single transfer delivers all or nothing
		let l = self.file.read(&mut buf)?;
		if l != count {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "short I2C read"));
		}
		Ok(buf)
	}
}

impl Bus for I2cDev {
	fn begin_transaction(&mut self, address: u8) {
		self.queued = Some((address, Vec::new()));
	}

	fn write_byte(&mut self, data: u8) -> usize {
		match self.queued {
			Some((_, ref mut queue)) => {
				queue.push(data);
				1
			},
			None => 0,
		}
	}

	fn end_transaction(&mut self) -> crate::AResult<()> {
		let (address, data) = match self.queued.take() {
			Some(q) => q,
			None => return Ok(()),
		};
		if data.is_empty() {
			return Ok(());
		}
		let path = self.path.clone();
		with_context!(("write to I2C device 0x{:02x} on {}", address, path), {
			self.set_slave(address).map_err(RtcError::Bus)?;
			self.file.write_all(&data).map_err(RtcError::Bus)?;
			Ok(())
		})
	}

	fn request_read(&mut self, address: u8, count: usize) -> usize {
		self.received.clear();
		match self.read_exact_from(address, count) {
			Ok(data) => {
				self.received.extend(data);
				count
			},
			Err(e) => {
				debug!("{}: read from 0x{:02x} failed: {}", self.path, address, e);
				0
			},
		}
	}

	fn byte_available(&mut self) -> bool {
		!self.received.is_empty()
	}

	fn read_byte(&mut self) -> u8 {
		self.received.pop_front().unwrap_or(crate::REGISTER_NOT_AVAILABLE)
	}
}

pub fn open_i2c_dev<P: AsRef<Path>>(path: P) -> io::Result<I2cDev> {
	let path = path.as_ref();
	let file = fs::OpenOptions::new()
		.read(true)
		.write(true)
		.open(path)?;

	Ok(I2cDev {
		file,
		path: path.display().to_string(),
		slave: None,
		queued: None,
		received: VecDeque::new(),
	})
}

/// `/dev/i2c-<bus>`
pub fn open_i2c_bus(bus: u32) -> io::Result<I2cDev> {
	open_i2c_dev(format!("/dev/i2c-{}", bus))
}
