//! Logging shims.
//!
//! The `log` crate is optional.
//! Without the `log` feature the arguments are still type checked, but nothing is formatted or logged.

#![allow(unused_macros)]

macro_rules! trace {
	($($args:tt)*) => {{
		#[cfg(feature = "log")]
		::log::trace!($($args)*);
		#[cfg(not(feature = "log"))]
		let _ = || drop(format!($($args)*));
	}};
}

macro_rules! debug {
	($($args:tt)*) => {{
		#[cfg(feature = "log")]
		::log::debug!($($args)*);
		#[cfg(not(feature = "log"))]
		let _ = || drop(format!($($args)*));
	}};
}

macro_rules! warn {
	($($args:tt)*) => {{
		#[cfg(feature = "log")]
		::log::warn!($($args)*);
		#[cfg(not(feature = "log"))]
		let _ = || drop(format!($($args)*));
	}};
}
