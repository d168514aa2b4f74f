use crate::error::{ConfigError, InvalidPort};
use crate::{CharLength, LineParameters, LineSettings, Parity, StopBits, SymbolRate};

/// The lexical form a port identifier must have.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PortSyntax {
	/// Any non-empty identifier.
	Any,

	/// A terminal device path like `/dev/ttyUSB0`, `/dev/ttyS1` or `/dev/cu.usbserial`.
	DevicePath,

	/// A COM port name like `COM3`, optionally in the device namespace (`\\.\COM12`).
	ComPort,
}

const DEVICE_PREFIXES: [&str; 2] = ["/dev/tty", "/dev/cu."];
const DEVICE_NAMESPACE: &str = r"\\.\";

impl PortSyntax {
	/// The port syntax of the platform the crate is compiled for.
	pub fn native() -> Self {
		if cfg!(windows) {
			Self::ComPort
		} else if cfg!(unix) {
			Self::DevicePath
		} else {
			Self::Any
		}
	}

	/// Check if a port identifier has this syntax.
	pub fn matches(self, port: &str) -> bool {
		if port.is_empty() {
			return false;
		}
		match self {
			Self::Any => true,
			Self::DevicePath => DEVICE_PREFIXES
				.iter()
				.filter_map(|prefix| port.strip_prefix(prefix))
				.any(|name| !name.is_empty() && !name.contains('/')),
			Self::ComPort => {
				let name = port.strip_prefix(DEVICE_NAMESPACE).unwrap_or(port);
				match name.get(..3) {
					Some(prefix) if prefix.eq_ignore_ascii_case("COM") => {
						let number = &name[3..];
						!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) && number.parse::<u32>().map_or(false, |n| n >= 1)
					},
					_ => false,
				}
			},
		}
	}
}

impl std::fmt::Display for PortSyntax {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Any => write!(f, "a non-empty port name"),
			Self::DevicePath => write!(f, "a device path like /dev/ttyUSB0"),
			Self::ComPort => write!(f, "a port name like COM3"),
		}
	}
}

impl LineParameters {
	/// Check the parameters against the supported values and the native port syntax.
	///
	/// Only the first invalid field is reported.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.validate_for(PortSyntax::native())
	}

	/// Check the parameters against the supported values and the given port syntax.
	pub fn validate_for(&self, syntax: PortSyntax) -> Result<(), ConfigError> {
		self.to_settings(syntax).map(drop)
	}

	/// Validate the parameters and convert them to typed [`LineSettings`].
	///
	/// Fields are checked in order: port, symbol rate, character length, stop bits, parity.
	pub fn to_settings(&self, syntax: PortSyntax) -> Result<LineSettings, ConfigError> {
		InvalidPort::check(&self.port, syntax)?;
		Ok(LineSettings {
			symbol_rate: SymbolRate::try_from(self.symbol_rate)?,
			char_length: CharLength::try_from(self.char_length)?,
			stop_bits: StopBits::try_from(self.stop_bits)?,
			parity: Parity::try_from(self.parity)?,
		})
	}
}
