//! Platform implementation for Windows, using the `serial2` crate to program the device control block (DCB).
//!
//! Windows has no readiness notification for COM ports that fits [`Platform::wait()`],
//! so reads block for at most [`POLL_INTERVAL`] and report [`std::io::ErrorKind::WouldBlock`] when nothing arrived.

use std::time::Duration;

use super::{Interest, Platform};
use crate::{CharLength, DeviceOperation, LineSettings, Parity, PlatformError, PortSyntax, StopBits};

/// Re-exported `serial2` crate in case you need to modify other port settings.
pub use serial2;

/// The longest time a single read or write waits for the device.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Windows COM ports programmed through the device control block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dcb;

fn would_block_on_timeout(error: std::io::Error) -> std::io::Error {
	if error.kind() == std::io::ErrorKind::TimedOut {
		std::io::ErrorKind::WouldBlock.into()
	} else {
		error
	}
}

impl Platform for Dcb {
	type Handle = serial2::SerialPort;

	fn port_syntax(&self) -> PortSyntax {
		PortSyntax::ComPort
	}

	fn open(&self, port: &str) -> Result<Self::Handle, PlatformError> {
		let open = || -> std::io::Result<Self::Handle> {
			let mut handle = serial2::SerialPort::open(port, serial2::KeepSettings)?;
			handle.set_read_timeout(POLL_INTERVAL)?;
			handle.set_write_timeout(POLL_INTERVAL)?;
			Ok(handle)
		};
		open().map_err(|e| PlatformError::new(DeviceOperation::Open, e))
	}

	fn apply_line_settings(&self, handle: &mut Self::Handle, settings: &LineSettings) -> Result<(), PlatformError> {
		let apply = |handle: &mut Self::Handle| -> std::io::Result<()> {
			let mut dcb = handle.get_configuration()?;
			dcb.set_raw();
			dcb.set_baud_rate(settings.symbol_rate.raw())?;
			dcb.set_char_size(match settings.char_length {
				CharLength::Bits5 => serial2::CharSize::Bits5,
				CharLength::Bits6 => serial2::CharSize::Bits6,
				CharLength::Bits7 => serial2::CharSize::Bits7,
				CharLength::Bits8 => serial2::CharSize::Bits8,
			});
			dcb.set_stop_bits(match settings.stop_bits {
				StopBits::One => serial2::StopBits::One,
				StopBits::Two => serial2::StopBits::Two,
			});
			dcb.set_parity(match settings.parity {
				Parity::None => serial2::Parity::None,
				Parity::Even => serial2::Parity::Even,
				Parity::Odd => serial2::Parity::Odd,
			});
			handle.set_configuration(&dcb)
		};
		apply(handle).map_err(|e| PlatformError::new(DeviceOperation::ApplySettings, e))
	}

	fn flush_queues(&self, handle: &mut Self::Handle) -> Result<(), PlatformError> {
		handle
			.discard_buffers()
			.map_err(|e| PlatformError::new(DeviceOperation::Flush, e))
	}

	/// Read available bytes, waiting at most [`POLL_INTERVAL`] for the first byte.
	fn read(&self, handle: &mut Self::Handle, buffer: &mut [u8]) -> std::io::Result<usize> {
		handle.read(buffer).map_err(would_block_on_timeout)
	}

	fn write(&self, handle: &mut Self::Handle, data: &[u8]) -> std::io::Result<usize> {
		handle.write(data).map_err(would_block_on_timeout)
	}

	fn wait(&self, _handle: &mut Self::Handle, _interest: Interest) -> std::io::Result<()> {
		Ok(())
	}

	/// Release the port by dropping it.
	///
	/// `serial2` closes the handle on drop and ignores the result, so this never fails.
	fn close(&self, handle: Self::Handle) -> std::io::Result<()> {
		drop(handle);
		Ok(())
	}
}
