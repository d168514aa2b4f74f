use serial_line::{DeviceOperation, Interest, LineSettings, Platform, PlatformError, PortSyntax};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// A call made on the mock platform.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Call {
	Open(String),
	Apply(LineSettings),
	Flush,
	Read,
	Write(Vec<u8>),
	Wait(Interest),
	Close(u32),
}

/// Shared state of a [`MockPlatform`], inspected by the tests.
#[derive(Default)]
pub struct MockState {
	/// Every call made on the platform, in order.
	pub calls: Vec<Call>,

	/// The handles that have been opened but not closed.
	pub open_handles: Vec<u32>,

	/// Data that "arrives" on the line, one chunk per read.
	pub incoming: VecDeque<Vec<u8>>,

	/// Everything written to the line.
	pub written: Vec<u8>,

	/// Accept at most this many bytes per write.
	pub max_write: Option<usize>,

	/// Make the next writes report that the device is busy.
	pub busy_writes: usize,

	pub fail_open: Option<i32>,
	pub fail_apply: Option<i32>,
	pub fail_flush: Option<i32>,
	pub fail_close: Option<i32>,

	next_handle: u32,
}

pub struct MockHandle {
	id: u32,
}

/// A platform that records calls instead of touching a device.
#[derive(Clone)]
pub struct MockPlatform {
	pub state: Arc<Mutex<MockState>>,
	pub syntax: PortSyntax,
}

impl MockPlatform {
	pub fn new() -> Self {
		Self {
			state: Arc::default(),
			syntax: PortSyntax::Any,
		}
	}

	pub fn with_syntax(syntax: PortSyntax) -> Self {
		Self { syntax, ..Self::new() }
	}

	pub fn state(&self) -> MutexGuard<'_, MockState> {
		self.state.lock().unwrap()
	}

	pub fn calls(&self) -> Vec<Call> {
		self.state().calls.clone()
	}

	pub fn push_incoming(&self, data: &[u8]) {
		self.state().incoming.push_back(data.to_vec());
	}
}

impl Platform for MockPlatform {
	type Handle = MockHandle;

	fn port_syntax(&self) -> PortSyntax {
		self.syntax
	}

	fn open(&self, port: &str) -> Result<Self::Handle, PlatformError> {
		let mut state = self.state();
		state.calls.push(Call::Open(port.to_owned()));
		if let Some(code) = state.fail_open {
			return Err(PlatformError::new(DeviceOperation::Open, std::io::Error::from_raw_os_error(code)));
		}
		state.next_handle += 1;
		let id = state.next_handle;
		state.open_handles.push(id);
		log::trace!("opened mock handle {} for {}", id, port);
		Ok(MockHandle { id })
	}

	fn apply_line_settings(&self, _handle: &mut Self::Handle, settings: &LineSettings) -> Result<(), PlatformError> {
		let mut state = self.state();
		state.calls.push(Call::Apply(*settings));
		match state.fail_apply {
			Some(code) => Err(PlatformError::new(
				DeviceOperation::ApplySettings,
				std::io::Error::from_raw_os_error(code),
			)),
			None => Ok(()),
		}
	}

	fn flush_queues(&self, _handle: &mut Self::Handle) -> Result<(), PlatformError> {
		let mut state = self.state();
		state.calls.push(Call::Flush);
		match state.fail_flush {
			Some(code) => Err(PlatformError::new(DeviceOperation::Flush, std::io::Error::from_raw_os_error(code))),
			None => {
				state.incoming.clear();
				Ok(())
			},
		}
	}

	fn read(&self, _handle: &mut Self::Handle, buffer: &mut [u8]) -> std::io::Result<usize> {
		let mut state = self.state();
		state.calls.push(Call::Read);
		let mut chunk = state.incoming.pop_front().ok_or(std::io::ErrorKind::WouldBlock)?;
		let count = buffer.len().min(chunk.len());
		buffer[..count].copy_from_slice(&chunk[..count]);
		if count < chunk.len() {
			state.incoming.push_front(chunk.split_off(count));
		}
		Ok(count)
	}

	fn write(&self, _handle: &mut Self::Handle, data: &[u8]) -> std::io::Result<usize> {
		let mut state = self.state();
		state.calls.push(Call::Write(data.to_vec()));
		if state.busy_writes > 0 {
			state.busy_writes -= 1;
			return Err(std::io::ErrorKind::WouldBlock.into());
		}
		let count = state.max_write.map_or(data.len(), |max| max.min(data.len()));
		state.written.extend_from_slice(&data[..count]);
		Ok(count)
	}

	fn wait(&self, _handle: &mut Self::Handle, interest: Interest) -> std::io::Result<()> {
		let mut state = self.state();
		state.calls.push(Call::Wait(interest));
		if interest == Interest::Readable && state.incoming.is_empty() {
			// Nothing will ever arrive: report it instead of hanging the test.
			return Err(std::io::Error::new(std::io::ErrorKind::Other, "no more mock data"));
		}
		Ok(())
	}

	fn close(&self, handle: Self::Handle) -> std::io::Result<()> {
		let mut state = self.state();
		state.calls.push(Call::Close(handle.id));
		state.open_handles.retain(|&id| id != handle.id);
		log::trace!("closed mock handle {}", handle.id);
		match state.fail_close {
			Some(code) => Err(std::io::Error::from_raw_os_error(code)),
			None => Ok(()),
		}
	}
}
