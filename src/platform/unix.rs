//! Platform implementation using the POSIX termios interface.

use std::fs::File;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, IntoRawFd};

use super::{Interest, Platform};
use crate::{CharLength, DeviceOperation, LineSettings, Parity, PlatformError, PortSyntax, StopBits, SymbolRate};

/// POSIX serial devices programmed through `termios`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Termios;

/// The termios fields derived from [`LineSettings`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Encoded {
	/// The speed constant for both the input and output speed.
	pub speed: libc::speed_t,

	/// The control flags, excluding the speed bits.
	pub control_flags: libc::tcflag_t,
}

fn speed(symbol_rate: SymbolRate) -> libc::speed_t {
	match symbol_rate {
		SymbolRate::Baud4800 => libc::B4800,
		SymbolRate::Baud9600 => libc::B9600,
		SymbolRate::Baud19200 => libc::B19200,
		SymbolRate::Baud38400 => libc::B38400,
		SymbolRate::Baud57600 => libc::B57600,
		SymbolRate::Baud115200 => libc::B115200,
	}
}

fn char_size(char_length: CharLength) -> libc::tcflag_t {
	match char_length {
		CharLength::Bits5 => libc::CS5,
		CharLength::Bits6 => libc::CS6,
		CharLength::Bits7 => libc::CS7,
		CharLength::Bits8 => libc::CS8,
	}
}

impl Termios {
	/// Compute the termios speed and control flags for the given settings.
	///
	/// The receiver is always enabled and modem control lines are ignored.
	/// All other flags start out cleared.
	pub fn encode(settings: &LineSettings) -> Encoded {
		let mut control_flags = libc::CREAD | libc::CLOCAL;
		control_flags |= char_size(settings.char_length);

		match settings.stop_bits {
			StopBits::One => control_flags &= !libc::CSTOPB,
			StopBits::Two => control_flags |= libc::CSTOPB,
		}

		match settings.parity {
			Parity::None => control_flags &= !(libc::PARENB | libc::PARODD),
			Parity::Even => {
				control_flags |= libc::PARENB;
				control_flags &= !libc::PARODD;
			},
			Parity::Odd => control_flags |= libc::PARENB | libc::PARODD,
		}

		Encoded {
			speed: speed(settings.symbol_rate),
			control_flags,
		}
	}

	/// Build a complete termios structure for the given settings.
	pub fn build(settings: &LineSettings) -> Result<libc::termios, PlatformError> {
		let encoded = Self::encode(settings);

		// Start from a plain structure: raw input, raw output, no local processing.
		// Safety: termios is a plain C struct for which all zeroes is a valid value.
		let mut termios: libc::termios = unsafe { std::mem::zeroed() };
		termios.c_cflag = encoded.control_flags;

		// Wait for at least one byte without timeout.
		// Together with O_NONBLOCK an empty queue reports EAGAIN instead of end-of-file.
		termios.c_cc[libc::VMIN] = 1;
		termios.c_cc[libc::VTIME] = 0;

		// Safety: termios is a valid, exclusively borrowed structure.
		unsafe {
			if libc::cfsetispeed(&mut termios, encoded.speed) != 0 {
				return Err(PlatformError::last_os_error(DeviceOperation::ApplySettings));
			}
			if libc::cfsetospeed(&mut termios, encoded.speed) != 0 {
				return Err(PlatformError::last_os_error(DeviceOperation::ApplySettings));
			}
		}
		Ok(termios)
	}
}

impl Platform for Termios {
	type Handle = File;

	fn port_syntax(&self) -> PortSyntax {
		PortSyntax::DevicePath
	}

	fn open(&self, port: &str) -> Result<Self::Handle, PlatformError> {
		std::fs::OpenOptions::new()
			.read(true)
			.write(true)
			.custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
			.open(port)
			.map_err(|e| PlatformError::new(DeviceOperation::Open, e))
	}

	fn apply_line_settings(&self, handle: &mut Self::Handle, settings: &LineSettings) -> Result<(), PlatformError> {
		let termios = Self::build(settings)?;
		// Safety: the file descriptor is open for the lifetime of the borrow and termios is fully initialized.
		if unsafe { libc::tcsetattr(handle.as_raw_fd(), libc::TCSANOW, &termios) } != 0 {
			return Err(PlatformError::last_os_error(DeviceOperation::ApplySettings));
		}
		Ok(())
	}

	fn flush_queues(&self, handle: &mut Self::Handle) -> Result<(), PlatformError> {
		// Safety: the file descriptor is open for the lifetime of the borrow.
		if unsafe { libc::tcflush(handle.as_raw_fd(), libc::TCIOFLUSH) } != 0 {
			return Err(PlatformError::last_os_error(DeviceOperation::Flush));
		}
		Ok(())
	}

	fn read(&self, handle: &mut Self::Handle, buffer: &mut [u8]) -> std::io::Result<usize> {
		std::io::Read::read(handle, buffer)
	}

	fn write(&self, handle: &mut Self::Handle, data: &[u8]) -> std::io::Result<usize> {
		std::io::Write::write(handle, data)
	}

	fn wait(&self, handle: &mut Self::Handle, interest: Interest) -> std::io::Result<()> {
		let events = match interest {
			Interest::Readable => libc::POLLIN,
			Interest::Writable => libc::POLLOUT,
		};
		let mut poll_fd = libc::pollfd {
			fd: handle.as_raw_fd(),
			events,
			revents: 0,
		};
		loop {
			// Safety: poll_fd is a single valid pollfd and the descriptor stays open during the call.
			let ready = unsafe { libc::poll(&mut poll_fd, 1, -1) };
			if ready >= 0 {
				// Hang-ups and errors are reported by the following read or write.
				return Ok(());
			}
			let error = std::io::Error::last_os_error();
			if error.kind() != std::io::ErrorKind::Interrupted {
				return Err(error);
			}
		}
	}

	fn close(&self, handle: Self::Handle) -> std::io::Result<()> {
		// Close the descriptor ourselves: dropping a File ignores errors from close(2).
		let fd = handle.into_raw_fd();
		// Safety: into_raw_fd() transferred ownership of the descriptor to us.
		if unsafe { libc::close(fd) } != 0 {
			return Err(std::io::Error::last_os_error());
		}
		Ok(())
	}
}
