use std::io::ErrorKind;

use crate::platform::{Interest, NativePlatform, Platform};
use crate::{AlreadyOpenError, ConfigError, Error, LineParameters, LineSettings, NotOpenError, PlatformError};

/// The number of bytes requested from the device per read while looking for a delimiter.
const READ_CHUNK_SIZE: usize = 256;

/// A serial connection with validated line settings.
///
/// A connection starts out closed.
/// Use [`Self::open()`] to acquire and program the device, and [`Self::close()`] to release it again.
/// A connection can be opened and closed any number of times.
/// Dropping an open connection releases the device.
pub struct Connection<P: Platform = NativePlatform> {
	/// The backend used to access the device.
	platform: P,

	/// The platform specific device identifier.
	port: String,

	/// The settings programmed into the device on open.
	settings: LineSettings,

	/// The device, present only while the connection is open.
	device: Option<OpenDevice<P::Handle>>,
}

/// A device handle that has been programmed with the line settings.
struct OpenDevice<Handle> {
	handle: Handle,

	/// Bytes read from the device that have not been returned to the caller yet.
	pending: Vec<u8>,
}

impl<Handle> OpenDevice<Handle> {
	/// Open the device and program the line settings.
	///
	/// If the settings can not be applied, the handle is released before the error is returned.
	fn acquire<P>(platform: &P, port: &str, settings: &LineSettings) -> Result<Self, PlatformError>
	where
		P: Platform<Handle = Handle>,
	{
		let mut handle = platform.open(port)?;
		if let Err(e) = platform.apply_line_settings(&mut handle, settings) {
			debug!("failed to configure {}, releasing it again: {}", port, e);
			if let Err(close_error) = platform.close(handle) {
				debug!("failed to release {} after configuration error: {}", port, close_error);
			}
			return Err(e);
		}
		Ok(Self {
			handle,
			pending: Vec::new(),
		})
	}

	/// Move up to `buffer.len()` pending bytes into the buffer.
	fn take_pending(&mut self, buffer: &mut [u8]) -> usize {
		let count = buffer.len().min(self.pending.len());
		buffer[..count].copy_from_slice(&self.pending[..count]);
		self.pending.drain(..count);
		count
	}

	/// Remove and return everything up to and including the first delimiter in the pending bytes.
	fn take_line(&mut self, delimiter: u8) -> Option<Vec<u8>> {
		let end = self.pending.iter().position(|&byte| byte == delimiter)?;
		let rest = self.pending.split_off(end + 1);
		Some(std::mem::replace(&mut self.pending, rest))
	}
}

impl Connection<NativePlatform> {
	/// Create a closed connection for the native platform.
	///
	/// The parameters are validated, including the port syntax of the platform.
	pub fn new(params: LineParameters) -> Result<Self, ConfigError> {
		Self::with_platform(NativePlatform::default(), params)
	}

	/// Create a closed connection for the native platform from typed settings.
	///
	/// Only the port still needs validation.
	pub fn from_settings(port: impl Into<String>, settings: LineSettings) -> Result<Self, ConfigError> {
		Self::new(LineParameters::new(port, settings))
	}
}

impl<P: Platform> Connection<P> {
	/// Create a closed connection that uses a specific platform backend.
	pub fn with_platform(platform: P, params: LineParameters) -> Result<Self, ConfigError> {
		let settings = params.to_settings(platform.port_syntax())?;
		Ok(Self {
			platform,
			port: params.port,
			settings,
			device: None,
		})
	}

	/// The platform specific device identifier.
	pub fn port(&self) -> &str {
		&self.port
	}

	/// The line settings used by this connection.
	pub fn settings(&self) -> &LineSettings {
		&self.settings
	}

	/// A copy of the parameters of this connection, suitable for saving.
	pub fn parameters(&self) -> LineParameters {
		LineParameters::new(self.port.clone(), self.settings)
	}

	/// The platform backend of this connection.
	pub fn platform(&self) -> &P {
		&self.platform
	}

	/// Check if the connection is open.
	pub fn is_open(&self) -> bool {
		self.device.is_some()
	}

	/// Open the device and program the line settings.
	///
	/// On failure the connection stays closed and no device handle is kept.
	pub fn open(&mut self) -> Result<(), Error> {
		if self.device.is_some() {
			return Err(AlreadyOpenError.into());
		}
		debug!("opening {} at {} baud ({})", self.port, self.settings.symbol_rate, self.settings);
		let device = OpenDevice::acquire(&self.platform, &self.port, &self.settings)?;
		trace!("applied line settings {:?} to {}", self.settings, self.port);
		self.device = Some(device);
		Ok(())
	}

	/// Write all bytes to the device.
	///
	/// Returns the number of bytes written, which is always `data.len()`.
	///
	/// A write interrupted by a signal (`EINTR`) is resumed; every other error is returned.
	pub fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
		let device = self.device.as_mut().ok_or(NotOpenError)?;
		let mut written = 0;
		while written < data.len() {
			match self.platform.write(&mut device.handle, &data[written..]) {
				Ok(0) => return Err(Error::Io(ErrorKind::WriteZero.into())),
				Ok(count) => written += count,
				Err(e) if e.kind() == ErrorKind::WouldBlock => self.platform.wait(&mut device.handle, Interest::Writable)?,
				Err(e) if e.kind() == ErrorKind::Interrupted => (),
				Err(e) => return Err(e.into()),
			}
		}
		trace!("wrote {:02X?} to {}", data, self.port);
		Ok(written)
	}

	/// Read from the device until the delimiter is received.
	///
	/// The returned bytes include the delimiter.
	/// Bytes received after the delimiter are kept for the next read.
	///
	/// This blocks until the delimiter arrives or the device reports an error.
	/// A read interrupted by a signal (`EINTR`) is resumed; every other error is returned.
	pub fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, Error> {
		let device = self.device.as_mut().ok_or(NotOpenError)?;
		let mut chunk = [0; READ_CHUNK_SIZE];
		loop {
			if let Some(line) = device.take_line(delimiter) {
				trace!("read {:02X?} from {}", line, self.port);
				return Ok(line);
			}
			match self.platform.read(&mut device.handle, &mut chunk) {
				Ok(0) => return Err(Error::Io(ErrorKind::UnexpectedEof.into())),
				Ok(count) => device.pending.extend_from_slice(&chunk[..count]),
				Err(e) if e.kind() == ErrorKind::WouldBlock => self.platform.wait(&mut device.handle, Interest::Readable)?,
				Err(e) if e.kind() == ErrorKind::Interrupted => (),
				Err(e) => return Err(e.into()),
			}
		}
	}

	/// Read the bytes that are available right now, up to the size of the buffer.
	///
	/// This performs at most one read on the device and does not wait for data.
	/// Returns 0 if nothing is available.
	///
	/// On Windows the read may still block for up to `platform::windows::POLL_INTERVAL`,
	/// the read timeout of the port.
	pub fn read_into(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
		let device = self.device.as_mut().ok_or(NotOpenError)?;
		if buffer.is_empty() {
			return Ok(0);
		}
		if !device.pending.is_empty() {
			return Ok(device.take_pending(buffer));
		}
		match self.platform.read(&mut device.handle, buffer) {
			Ok(count) => {
				trace!("read {:02X?} from {}", &buffer[..count], self.port);
				Ok(count)
			},
			Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
			Err(e) => Err(e.into()),
		}
	}

	/// Discard all received data that has not been read and all written data that has not been transmitted.
	///
	/// If the device refuses to discard its queues, data already buffered by the connection is kept.
	pub fn flush(&mut self) -> Result<(), Error> {
		let device = self.device.as_mut().ok_or(NotOpenError)?;
		debug!("discarding input and output queues of {}", self.port);
		self.platform.flush_queues(&mut device.handle)?;
		device.pending.clear();
		Ok(())
	}

	/// Release the device.
	///
	/// The connection is closed afterwards, even if releasing the device reported an error.
	///
	/// On Windows the port is released by dropping it, so no release error is ever reported there.
	pub fn close(&mut self) -> Result<(), Error> {
		let device = self.device.take().ok_or(NotOpenError)?;
		debug!("closing {}", self.port);
		self.platform.close(device.handle)?;
		Ok(())
	}
}

impl<P: Platform> Drop for Connection<P> {
	fn drop(&mut self) {
		if let Some(device) = self.device.take() {
			if let Err(e) = self.platform.close(device.handle) {
				warn!("failed to close {}: {}", self.port, e);
			}
		}
	}
}

impl<P: Platform> std::fmt::Debug for Connection<P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Connection")
			.field("port", &self.port)
			.field("settings", &self.settings)
			.field("is_open", &self.is_open())
			.finish_non_exhaustive()
	}
}

impl<P: Platform> std::fmt::Display for Connection<P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"port: {}, baud rate: {}, parameters: {}",
			self.port, self.settings.symbol_rate, self.settings
		)
	}
}
