//! Two-wire (I²C) bus transport as seen by the DS3232 driver.
//!
//! A write transaction addresses a device, queues bytes and commits them
//! all at once; register accesses start with the register index as the
//! first queued byte, further bytes go to the following registers (the chip
//! auto-increments its register pointer).
//!
//! A read is a separate request for `count` bytes starting at the current
//! register pointer; the received bytes are then drained one by one. If
//! the device doesn't answer no bytes become available; there is no other
//! error signalling on the read side.
mod hardware;
pub mod linux;
mod registers;
mod simulated;

pub use self::hardware::{
	Bus,
	WriteTransaction,
};

pub use self::registers::RegisterExt;

pub use self::simulated::{
	Access,
	SimulatedBus,
};
