//! Saving and loading line parameters as JSON files.

use std::path::Path;

use crate::platform::{NativePlatform, Platform};
use crate::{Connection, LineParameters, LoadError, PortSyntax, SaveError};

impl LineParameters {
	/// Save the parameters to a JSON file, replacing the file if it exists.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
		let data = serde_json::to_vec_pretty(self)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	/// Load parameters from a JSON file and validate them for the native platform.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		Self::load_for(path, PortSyntax::native())
	}

	/// Load parameters from a JSON file and validate them with the given port syntax.
	///
	/// A file with unsupported values is rejected, nothing is coerced.
	pub fn load_for(path: impl AsRef<Path>, syntax: PortSyntax) -> Result<Self, LoadError> {
		let data = std::fs::read(path)?;
		let params: Self = serde_json::from_slice(&data)?;
		params.validate_for(syntax)?;
		Ok(params)
	}
}

impl Connection<NativePlatform> {
	/// Create a closed connection with parameters loaded from a JSON file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		Self::load_with_platform(NativePlatform::default(), path)
	}
}

impl<P: Platform> Connection<P> {
	/// Create a closed connection for a specific platform with parameters loaded from a JSON file.
	pub fn load_with_platform(platform: P, path: impl AsRef<Path>) -> Result<Self, LoadError> {
		let params = LineParameters::load_for(path, platform.port_syntax())?;
		Ok(Self::with_platform(platform, params)?)
	}

	/// Save the parameters of this connection to a JSON file.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
		self.parameters().save(path)
	}
}
