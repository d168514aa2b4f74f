use crate::{CharLength, Parity, PortSyntax, StopBits, SymbolRate};

/// An error that can occur while operating a [`Connection`](crate::Connection).
#[derive(Debug)]
pub enum Error {
	/// The line parameters are not valid.
	Config(ConfigError),

	/// The operation requires an open connection.
	NotOpen(NotOpenError),

	/// The connection is already open.
	AlreadyOpen(AlreadyOpenError),

	/// Opening or programming the device failed.
	Platform(PlatformError),

	/// A data transfer or the release of the device failed.
	Io(std::io::Error),
}

/// The line parameters are not valid.
///
/// Validation stops at the first invalid field,
/// so at most one problem is reported.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
	InvalidPort(InvalidPort),
	InvalidSymbolRate(InvalidSymbolRate),
	InvalidCharLength(InvalidCharLength),
	InvalidStopBits(InvalidStopBits),
	InvalidParity(InvalidParity),
}

/// The port identifier does not have the form required by the platform.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidPort {
	pub actual: String,
	pub expected: PortSyntax,
}

/// The symbol rate is not one of the supported rates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidSymbolRate {
	pub actual: u32,
}

/// The character length is not one of the supported lengths.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidCharLength {
	pub actual: u8,
}

/// The number of stop bits is not 1 or 2.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidStopBits {
	pub actual: u8,
}

/// The parity value is not 0 (none), 1 (even) or 2 (odd).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidParity {
	pub actual: u8,
}

/// The connection is not open.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NotOpenError;

/// The connection is already open.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AlreadyOpenError;

/// A device-level operation that can fail with an OS error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeviceOperation {
	/// Acquiring the device handle.
	Open,

	/// Applying the line settings to the device.
	ApplySettings,

	/// Discarding the input and output queues of the device.
	Flush,
}

/// An OS call on the device failed.
#[derive(Debug)]
pub struct PlatformError {
	pub operation: DeviceOperation,
	pub source: std::io::Error,
}

/// An error that can occur while loading line parameters from a file.
#[cfg(feature = "json")]
#[derive(Debug)]
pub enum LoadError {
	Io(std::io::Error),
	Json(serde_json::Error),
	Config(ConfigError),
}

/// An error that can occur while saving line parameters to a file.
#[cfg(feature = "json")]
#[derive(Debug)]
pub enum SaveError {
	Io(std::io::Error),
	Json(serde_json::Error),
}

impl InvalidPort {
	pub fn check(actual: &str, expected: PortSyntax) -> Result<(), Self> {
		if expected.matches(actual) {
			Ok(())
		} else {
			Err(Self {
				actual: actual.to_owned(),
				expected,
			})
		}
	}
}

impl PlatformError {
	pub fn new(operation: DeviceOperation, source: std::io::Error) -> Self {
		Self { operation, source }
	}

	/// Create a platform error from the last OS error of the calling thread.
	pub fn last_os_error(operation: DeviceOperation) -> Self {
		Self::new(operation, std::io::Error::last_os_error())
	}

	/// The raw OS error code, if the error came from the OS.
	pub fn os_code(&self) -> Option<i32> {
		self.source.raw_os_error()
	}
}

impl Error {
	/// The raw OS error code, if the error came from the OS.
	pub fn os_code(&self) -> Option<i32> {
		match self {
			Self::Platform(e) => e.os_code(),
			Self::Io(e) => e.raw_os_error(),
			Self::Config(_) | Self::NotOpen(_) | Self::AlreadyOpen(_) => None,
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Config(e) => Some(e),
			Self::NotOpen(e) => Some(e),
			Self::AlreadyOpen(e) => Some(e),
			Self::Platform(e) => Some(e),
			Self::Io(e) => Some(e),
		}
	}
}

impl std::error::Error for ConfigError {}
impl std::error::Error for InvalidPort {}
impl std::error::Error for InvalidSymbolRate {}
impl std::error::Error for InvalidCharLength {}
impl std::error::Error for InvalidStopBits {}
impl std::error::Error for InvalidParity {}
impl std::error::Error for NotOpenError {}
impl std::error::Error for AlreadyOpenError {}

impl std::error::Error for PlatformError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.source)
	}
}

#[cfg(feature = "json")]
impl std::error::Error for LoadError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			Self::Json(e) => Some(e),
			Self::Config(e) => Some(e),
		}
	}
}

#[cfg(feature = "json")]
impl std::error::Error for SaveError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			Self::Json(e) => Some(e),
		}
	}
}

impl From<ConfigError> for Error {
	fn from(other: ConfigError) -> Self {
		Self::Config(other)
	}
}

impl From<NotOpenError> for Error {
	fn from(other: NotOpenError) -> Self {
		Self::NotOpen(other)
	}
}

impl From<AlreadyOpenError> for Error {
	fn from(other: AlreadyOpenError) -> Self {
		Self::AlreadyOpen(other)
	}
}

impl From<PlatformError> for Error {
	fn from(other: PlatformError) -> Self {
		Self::Platform(other)
	}
}

impl From<std::io::Error> for Error {
	fn from(other: std::io::Error) -> Self {
		Self::Io(other)
	}
}

impl From<InvalidPort> for ConfigError {
	fn from(other: InvalidPort) -> Self {
		Self::InvalidPort(other)
	}
}

impl From<InvalidSymbolRate> for ConfigError {
	fn from(other: InvalidSymbolRate) -> Self {
		Self::InvalidSymbolRate(other)
	}
}

impl From<InvalidCharLength> for ConfigError {
	fn from(other: InvalidCharLength) -> Self {
		Self::InvalidCharLength(other)
	}
}

impl From<InvalidStopBits> for ConfigError {
	fn from(other: InvalidStopBits) -> Self {
		Self::InvalidStopBits(other)
	}
}

impl From<InvalidParity> for ConfigError {
	fn from(other: InvalidParity) -> Self {
		Self::InvalidParity(other)
	}
}

#[cfg(feature = "json")]
impl From<std::io::Error> for LoadError {
	fn from(other: std::io::Error) -> Self {
		Self::Io(other)
	}
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for LoadError {
	fn from(other: serde_json::Error) -> Self {
		Self::Json(other)
	}
}

#[cfg(feature = "json")]
impl From<ConfigError> for LoadError {
	fn from(other: ConfigError) -> Self {
		Self::Config(other)
	}
}

#[cfg(feature = "json")]
impl From<std::io::Error> for SaveError {
	fn from(other: std::io::Error) -> Self {
		Self::Io(other)
	}
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for SaveError {
	fn from(other: serde_json::Error) -> Self {
		Self::Json(other)
	}
}

fn write_list<T: std::fmt::Display>(f: &mut std::fmt::Formatter, values: impl IntoIterator<Item = T>) -> std::fmt::Result {
	for (i, value) in values.into_iter().enumerate() {
		if i > 0 {
			write!(f, ", ")?;
		}
		write!(f, "{}", value)?;
	}
	Ok(())
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Config(e) => write!(f, "{}", e),
			Self::NotOpen(e) => write!(f, "{}", e),
			Self::AlreadyOpen(e) => write!(f, "{}", e),
			Self::Platform(e) => write!(f, "{}", e),
			Self::Io(e) => write!(f, "serial transfer failed: {}", e),
		}
	}
}

impl std::fmt::Display for ConfigError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::InvalidPort(e) => write!(f, "{}", e),
			Self::InvalidSymbolRate(e) => write!(f, "{}", e),
			Self::InvalidCharLength(e) => write!(f, "{}", e),
			Self::InvalidStopBits(e) => write!(f, "{}", e),
			Self::InvalidParity(e) => write!(f, "{}", e),
		}
	}
}

impl std::fmt::Display for InvalidPort {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid port {:?}, expected {}", self.actual, self.expected)
	}
}

impl std::fmt::Display for InvalidSymbolRate {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid baud rate {}, expected one of ", self.actual)?;
		write_list(f, SymbolRate::ALL.iter().map(|x| x.raw()))
	}
}

impl std::fmt::Display for InvalidCharLength {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid number of data bits {}, expected one of ", self.actual)?;
		write_list(f, CharLength::ALL.iter().map(|x| x.raw()))
	}
}

impl std::fmt::Display for InvalidStopBits {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid number of stop bits {}, expected one of ", self.actual)?;
		write_list(f, StopBits::ALL.iter().map(|x| x.raw()))
	}
}

impl std::fmt::Display for InvalidParity {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "invalid parity {}, expected one of ", self.actual)?;
		write_list(f, Parity::ALL.iter().map(|x| format!("{} ({:?})", x.raw(), x)))
	}
}

impl std::fmt::Display for NotOpenError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "serial connection is not open")
	}
}

impl std::fmt::Display for AlreadyOpenError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "serial connection is already open")
	}
}

impl std::fmt::Display for DeviceOperation {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Open => write!(f, "open serial port"),
			Self::ApplySettings => write!(f, "apply line settings"),
			Self::Flush => write!(f, "discard input and output queues"),
		}
	}
}

impl std::fmt::Display for PlatformError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "failed to {}: {}", self.operation, self.source)
	}
}

#[cfg(feature = "json")]
impl std::fmt::Display for LoadError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Io(e) => write!(f, "failed to read line parameters: {}", e),
			Self::Json(e) => write!(f, "failed to parse line parameters: {}", e),
			Self::Config(e) => write!(f, "loaded line parameters are not valid: {}", e),
		}
	}
}

#[cfg(feature = "json")]
impl std::fmt::Display for SaveError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Io(e) => write!(f, "failed to write line parameters: {}", e),
			Self::Json(e) => write!(f, "failed to serialize line parameters: {}", e),
		}
	}
}
