//! Portable configuration and lifecycle of serial (RS-232) lines.
//!
//! A [`Connection`] is created from [`LineParameters`] (port, symbol rate, character length, stop bits and parity).
//! The parameters are validated when the connection is created,
//! and programmed into the device by the [`Platform`] backend of the OS when the connection is opened.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use serial_line::{Connection, LineParameters};
//!
//! let mut connection = Connection::new(LineParameters {
//! 	port: "/dev/ttyUSB0".into(),
//! 	symbol_rate: 115200,
//! 	char_length: 8,
//! 	stop_bits: 1,
//! 	parity: 0,
//! })?;
//! connection.open()?;
//! connection.write(b"hello\n")?;
//! let reply = connection.read_until(b'\n')?;
//! connection.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! Flow control is not supported: every backend programs the line without hardware or software flow control.

#[macro_use]
mod log;

pub mod platform;

mod connection;
mod error;
mod params;
#[cfg(feature = "json")]
mod persist;
mod validate;

pub use connection::Connection;
pub use error::*;
pub use params::{CharLength, LineParameters, LineSettings, Parity, StopBits, SymbolRate};
pub use platform::{Interest, NativePlatform, Platform};
pub use validate::PortSyntax;
