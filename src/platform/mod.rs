//! [`Platform`] trait to program and use serial devices on different operating systems.
//!
//! Every OS family expresses the same line settings with its own control structure.
//! Each backend implements [`Platform`] once, and [`NativePlatform`] selects the backend for the build target.

use crate::{LineSettings, PlatformError, PortSyntax};

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

/// The backend for the platform the crate is compiled for.
#[cfg(unix)]
pub type NativePlatform = unix::Termios;

/// The backend for the platform the crate is compiled for.
#[cfg(windows)]
pub type NativePlatform = windows::Dcb;

/// The readiness to wait for with [`Platform::wait()`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Interest {
	Readable,
	Writable,
}

/// Access to serial devices through the device-control interface of an OS family.
///
/// The platform does not keep track of handles: the caller owns each handle and must pass it to [`Platform::close()`] exactly once.
pub trait Platform {
	/// The OS resource representing an open device.
	type Handle;

	/// The syntax that port identifiers must have on this platform.
	fn port_syntax(&self) -> PortSyntax;

	/// Open a device for reading and writing in non-blocking mode, without making it the controlling terminal.
	fn open(&self, port: &str) -> Result<Self::Handle, PlatformError>;

	/// Program the line settings into an open device.
	fn apply_line_settings(&self, handle: &mut Self::Handle, settings: &LineSettings) -> Result<(), PlatformError>;

	/// Discard all data received but not read, and all data written but not transmitted.
	fn flush_queues(&self, handle: &mut Self::Handle) -> Result<(), PlatformError>;

	/// Read available bytes without blocking.
	///
	/// Fails with [`std::io::ErrorKind::WouldBlock`] if no data is available.
	fn read(&self, handle: &mut Self::Handle, buffer: &mut [u8]) -> std::io::Result<usize>;

	/// Write as many bytes as the device accepts without blocking.
	///
	/// Fails with [`std::io::ErrorKind::WouldBlock`] if the device accepts no data right now.
	fn write(&self, handle: &mut Self::Handle, data: &[u8]) -> std::io::Result<usize>;

	/// Block until the device is ready for the given kind of transfer.
	///
	/// Backends that can not wait for readiness may return immediately.
	fn wait(&self, handle: &mut Self::Handle, interest: Interest) -> std::io::Result<()>;

	/// Release the device.
	fn close(&self, handle: Self::Handle) -> std::io::Result<()>;
}
