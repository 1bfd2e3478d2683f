use std::io;

use failure::Fail;

/// Register value reported by the legacy API when a read yields no data.
pub const REGISTER_NOT_AVAILABLE: u8 = 0xFF;

/// Out-of-band temperature (and fraction) value reported by the legacy API.
pub const NO_TEMPERATURE: i8 = 0x7F;

/// Stream byte reported by the legacy API at end of window or on a dead bus.
pub const END_OF_STREAM: i32 = -1;

#[derive(Debug, Fail)]
pub enum RtcError {
	/// the bus delivered no data for a read request
	#[fail(display = "no data available from device")]
	NotAvailable,

	#[fail(display = "invalid date/time: {}", _0)]
	InvalidDateTime(String),

	#[fail(display = "bus transfer failed: {}", _0)]
	Bus(#[cause] io::Error),
}

impl RtcError {
	pub fn invalid_date_time<S: Into<String>>(msg: S) -> failure::Error {
		RtcError::InvalidDateTime(msg.into()).into()
	}
}

pub fn is_not_available(e: &failure::Error) -> bool {
	match e.downcast_ref::<RtcError>() {
		Some(RtcError::NotAvailable) => true,
		_ => false,
	}
}

/// Map [`RtcError::NotAvailable`] to a legacy sentinel value; every other
/// error is passed through.
pub trait OrSentinel<T> {
	fn or_sentinel(self, sentinel: T) -> crate::AResult<T>;
}

impl<T> OrSentinel<T> for crate::AResult<T> {
	fn or_sentinel(self, sentinel: T) -> crate::AResult<T> {
		match self {
			Err(ref e) if is_not_available(e) => Ok(sentinel),
			r => r,
		}
	}
}
