#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod bus;
pub mod ds3232;
mod error;
pub mod sram;
pub mod time;

pub use self::error::{
	END_OF_STREAM,
	is_not_available,
	NO_TEMPERATURE,
	OrSentinel,
	REGISTER_NOT_AVAILABLE,
	RtcError,
};

pub use self::ds3232::{
	Ds3232,
	open_ds3232,
};
pub use self::sram::Sram;
pub use self::time::CalendarTime;

#[cfg(test)]
pub(crate) fn init_test_logging() {
	let _ = env_logger::Builder::from_default_env().is_test(true).try_init();
}
