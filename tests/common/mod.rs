#![allow(dead_code)]

pub mod mock_platform;

use serial_line::LineParameters;

pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

pub fn params(port: &str, symbol_rate: u32, char_length: u8, stop_bits: u8, parity: u8) -> LineParameters {
	LineParameters {
		port: port.into(),
		symbol_rate,
		char_length,
		stop_bits,
		parity,
	}
}
