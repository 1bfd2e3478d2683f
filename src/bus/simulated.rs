use std::collections::VecDeque;

use super::Bus;
use crate::ds3232::consts::*;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Access {
	Write {
		address: u8,
		data: Vec<u8>,
	},
	Read {
		address: u8,
		register: u8,
		count: usize,
	},
}

/// In-memory DS3232 register file behind a bus.
///
/// Models the auto-incrementing register pointer, the read-only
/// temperature registers and the status register write rules (BSY is read
/// only, A1F/A2F can only be cleared). Registers have no side effects
/// otherwise; the clock doesn't tick.
pub struct SimulatedBus {
	address: u8,
	registers: [u8; 256],
	pointer: u8,
	present: bool,
	pending: Option<(u8, Vec<u8>)>,
	received: VecDeque<u8>,
	accesses: Vec<Access>,
}

impl SimulatedBus {
	pub fn new() -> Self {
		Self::with_address(DS3232_ADDRESS)
	}

	pub fn with_address(address: u8) -> Self {
		SimulatedBus {
			address,
			registers: [0u8; 256],
			pointer: 0,
			present: true,
			pending: None,
			received: VecDeque::new(),
			accesses: Vec::new(),
		}
	}

	/// an absent device still accepts writes, but never delivers data
	pub fn set_present(&mut self, present: bool) {
		self.present = present;
	}

	pub fn register(&self, register: u8) -> u8 {
		self.registers[register as usize]
	}

	// direct access, bypassing write rules
	pub fn set_register(&mut self, register: u8, value: u8) {
		self.registers[register as usize] = value;
	}

	pub fn registers(&self) -> &[u8] {
		&self.registers[..]
	}

	pub fn accesses(&self) -> &[Access] {
		&self.accesses
	}

	pub fn clear_accesses(&mut self) {
		self.accesses.clear();
	}

	fn store(&mut self, register: u8, value: u8) {
		let old = self.registers[register as usize];
		self.registers[register as usize] = match register {
			REG_STATUS => {
				const ALARM_FLAGS: u8 = STATUS_A1F | STATUS_A2F;
				(value & !(STATUS_BSY | ALARM_FLAGS))
				| (old & STATUS_BSY)
				| (old & value & ALARM_FLAGS)
			},
			REG_TEMPERATURE_MSB | REG_TEMPERATURE_LSB => old,
			_ => value,
		};
	}
}

impl Default for SimulatedBus {
	fn default() -> Self {
		Self::new()
	}
}

impl Bus for SimulatedBus {
	fn begin_transaction(&mut self, address: u8) {
		self.pending = Some((address, Vec::new()));
	}

	fn write_byte(&mut self, data: u8) -> usize {
		match self.pending {
			Some((_, ref mut queue)) => {
				queue.push(data);
				1
			},
			None => 0,
		}
	}

	fn end_transaction(&mut self) -> crate::AResult<()> {
		let (address, data) = match self.pending.take() {
			Some(p) => p,
			None => return Ok(()),
		};
		self.accesses.push(Access::Write {
			address,
			data: data.clone(),
		});
		if address != self.address || !self.present {
			return Ok(());
		}
		if let Some((register, values)) = data.split_first() {
			self.pointer = *register;
			for v in values {
				let r = self.pointer;
				self.store(r, *v);
				self.pointer = self.pointer.wrapping_add(1);
			}
		}
		Ok(())
	}

	fn request_read(&mut self, address: u8, count: usize) -> usize {
		self.received.clear();
		self.accesses.push(Access::Read {
			address,
			register: self.pointer,
			count,
		});
		if address != self.address || !self.present {
			return 0;
		}
		for _ in 0..count {
			self.received.push_back(self.registers[self.pointer as usize]);
			self.pointer = self.pointer.wrapping_add(1);
		}
		count
	}

	fn byte_available(&mut self) -> bool {
		!self.received.is_empty()
	}

	fn read_byte(&mut self) -> u8 {
		self.received.pop_front().unwrap_or(crate::REGISTER_NOT_AVAILABLE)
	}
}
