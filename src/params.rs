//! Line parameter model.
//!
//! The typed values ([`SymbolRate`], [`CharLength`], [`StopBits`], [`Parity`]) can only hold supported settings.
//! [`LineParameters`] is the raw, serializable form that may still hold anything until it is validated.

use crate::error::{InvalidCharLength, InvalidParity, InvalidStopBits, InvalidSymbolRate};

/// The number of symbols transmitted per second.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SymbolRate {
	Baud4800,
	Baud9600,
	Baud19200,
	Baud38400,
	Baud57600,
	Baud115200,
}

/// The number of data bits in each character.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum CharLength {
	Bits5,
	Bits6,
	Bits7,
	Bits8,
}

/// The number of stop bits sent after each character.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum StopBits {
	One,
	Two,
}

/// The error detection bit added to each character.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Parity {
	/// No parity bit.
	None,

	/// The parity bit makes the number of set bits even.
	Even,

	/// The parity bit makes the number of set bits odd.
	Odd,
}

/// Validated line settings, ready to be programmed into a device.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct LineSettings {
	pub symbol_rate: SymbolRate,
	pub char_length: CharLength,
	pub stop_bits: StopBits,
	pub parity: Parity,
}

/// Raw line parameters as supplied by a user or read from a file.
///
/// Nothing about the values is guaranteed until [`LineParameters::validate()`] succeeds.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase", deny_unknown_fields))]
pub struct LineParameters {
	/// The platform specific device identifier, like `/dev/ttyUSB0` or `COM3`.
	pub port: String,

	/// The symbol rate in baud.
	pub symbol_rate: u32,

	/// The number of data bits per character.
	pub char_length: u8,

	/// The number of stop bits per character.
	pub stop_bits: u8,

	/// The parity: 0 for none, 1 for even and 2 for odd.
	pub parity: u8,
}

impl SymbolRate {
	/// All supported symbol rates, slowest first.
	pub const ALL: [Self; 6] = [
		Self::Baud4800,
		Self::Baud9600,
		Self::Baud19200,
		Self::Baud38400,
		Self::Baud57600,
		Self::Baud115200,
	];

	/// The symbol rate in baud.
	pub fn raw(self) -> u32 {
		match self {
			Self::Baud4800 => 4800,
			Self::Baud9600 => 9600,
			Self::Baud19200 => 19200,
			Self::Baud38400 => 38400,
			Self::Baud57600 => 57600,
			Self::Baud115200 => 115200,
		}
	}
}

impl CharLength {
	/// All supported character lengths, shortest first.
	pub const ALL: [Self; 4] = [Self::Bits5, Self::Bits6, Self::Bits7, Self::Bits8];

	/// The number of data bits.
	pub fn raw(self) -> u8 {
		match self {
			Self::Bits5 => 5,
			Self::Bits6 => 6,
			Self::Bits7 => 7,
			Self::Bits8 => 8,
		}
	}
}

impl StopBits {
	pub const ALL: [Self; 2] = [Self::One, Self::Two];

	/// The number of stop bits.
	pub fn raw(self) -> u8 {
		match self {
			Self::One => 1,
			Self::Two => 2,
		}
	}
}

impl Parity {
	pub const ALL: [Self; 3] = [Self::None, Self::Even, Self::Odd];

	/// The numeric code used in persisted parameter files.
	pub fn raw(self) -> u8 {
		match self {
			Self::None => 0,
			Self::Even => 1,
			Self::Odd => 2,
		}
	}

	/// The single letter used in the compact `8N1` notation.
	pub fn letter(self) -> char {
		match self {
			Self::None => 'N',
			Self::Even => 'E',
			Self::Odd => 'O',
		}
	}
}

impl TryFrom<u32> for SymbolRate {
	type Error = InvalidSymbolRate;

	fn try_from(raw: u32) -> Result<Self, Self::Error> {
		Self::ALL
			.iter()
			.copied()
			.find(|x| x.raw() == raw)
			.ok_or(InvalidSymbolRate { actual: raw })
	}
}

impl TryFrom<u8> for CharLength {
	type Error = InvalidCharLength;

	fn try_from(raw: u8) -> Result<Self, Self::Error> {
		match raw {
			5 => Ok(Self::Bits5),
			6 => Ok(Self::Bits6),
			7 => Ok(Self::Bits7),
			8 => Ok(Self::Bits8),
			_ => Err(InvalidCharLength { actual: raw }),
		}
	}
}

impl TryFrom<u8> for StopBits {
	type Error = InvalidStopBits;

	fn try_from(raw: u8) -> Result<Self, Self::Error> {
		match raw {
			1 => Ok(Self::One),
			2 => Ok(Self::Two),
			_ => Err(InvalidStopBits { actual: raw }),
		}
	}
}

impl TryFrom<u8> for Parity {
	type Error = InvalidParity;

	fn try_from(raw: u8) -> Result<Self, Self::Error> {
		match raw {
			0 => Ok(Self::None),
			1 => Ok(Self::Even),
			2 => Ok(Self::Odd),
			_ => Err(InvalidParity { actual: raw }),
		}
	}
}

impl Default for LineSettings {
	/// 9600 baud, 8 data bits, no parity, 1 stop bit.
	fn default() -> Self {
		Self {
			symbol_rate: SymbolRate::Baud9600,
			char_length: CharLength::Bits8,
			stop_bits: StopBits::One,
			parity: Parity::None,
		}
	}
}

impl LineParameters {
	/// Create raw parameters from already typed settings.
	pub fn new(port: impl Into<String>, settings: LineSettings) -> Self {
		Self {
			port: port.into(),
			symbol_rate: settings.symbol_rate.raw(),
			char_length: settings.char_length.raw(),
			stop_bits: settings.stop_bits.raw(),
			parity: settings.parity.raw(),
		}
	}
}

impl std::fmt::Display for SymbolRate {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.raw())
	}
}

impl std::fmt::Display for LineSettings {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}{}{}", self.char_length.raw(), self.parity.letter(), self.stop_bits.raw())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert2::{assert, let_assert};

	#[test]
	fn symbol_rates_outside_the_table_are_rejected() {
		for raw in [0, 1200, 2400, 4799, 9601, 14400, 230400, u32::MAX] {
			let_assert!(Err(e) = SymbolRate::try_from(raw));
			assert!(e.actual == raw);
		}
		for rate in SymbolRate::ALL {
			assert!(SymbolRate::try_from(rate.raw()) == Ok(rate));
		}
	}

	#[test]
	fn nine_bit_characters_are_rejected() {
		assert!(let Err(InvalidCharLength { actual: 9 }) = CharLength::try_from(9u8));
		assert!(let Err(InvalidCharLength { actual: 4 }) = CharLength::try_from(4u8));
		assert!(CharLength::try_from(7u8) == Ok(CharLength::Bits7));
	}

	#[test]
	fn stop_bits_and_parity_codes() {
		assert!(let Err(InvalidStopBits { actual: 0 }) = StopBits::try_from(0u8));
		assert!(let Err(InvalidStopBits { actual: 3 }) = StopBits::try_from(3u8));
		assert!(let Err(InvalidParity { actual: 3 }) = Parity::try_from(3u8));
		assert!(Parity::try_from(2u8) == Ok(Parity::Odd));
	}

	#[test]
	fn compact_notation() {
		let settings = LineSettings {
			symbol_rate: SymbolRate::Baud19200,
			char_length: CharLength::Bits7,
			stop_bits: StopBits::Two,
			parity: Parity::Even,
		};
		assert!(settings.to_string() == "7E2");
		assert!(LineSettings::default().to_string() == "8N1");
	}

	#[test]
	fn raw_parameters_from_settings() {
		let params = LineParameters::new("/dev/ttyS0", LineSettings::default());
		assert!(params.symbol_rate == 9600);
		assert!(params.char_length == 8);
		assert!(params.stop_bits == 1);
		assert!(params.parity == 0);
	}
}
