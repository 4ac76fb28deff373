//! Mock transport for testing

use super::Transport;
use crate::error::Result;
use crate::protocol::{response_frame, CommandError, ResponseType};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Produces the frames the simulated peer answers with for one sent frame.
pub type Responder = Box<dyn FnMut(&[u8]) -> Vec<Vec<u8>> + Send>;

/// Mock transport for unit testing
///
/// Reads are served chunk by chunk: every injected chunk is what one
/// `read()` call returns, so short and malformed frames can be scripted
/// exactly. A [`Responder`] can additionally answer every sent frame.
/// Clones share state, so a test can keep a handle after moving the
/// transport into a session.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    reads: VecDeque<Vec<u8>>,
    written: Vec<Vec<u8>>,
    responder: Option<Responder>,
    reconnects: usize,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                reads: VecDeque::new(),
                written: Vec::new(),
                responder: None,
                reconnects: 0,
            })),
        }
    }

    /// Create a mock transport whose peer answers every frame via `responder`
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&[u8]) -> Vec<Vec<u8>> + Send + 'static,
    {
        let transport = Self::new();
        transport.lock().responder = Some(Box::new(responder));
        transport
    }

    /// Peer that acknowledges and completes every command
    pub fn auto_complete() -> Self {
        Self::with_responder(completed_exchange)
    }

    /// Inject one chunk to be returned by a single read
    pub fn inject_read(&self, data: &[u8]) {
        self.lock().reads.push_back(data.to_vec());
    }

    /// Get all written frames in order
    pub fn get_written(&self) -> Vec<Vec<u8>> {
        self.lock().written.clone()
    }

    /// Clear written data
    pub fn clear_written(&self) {
        self.lock().written.clear();
    }

    /// Clear pending reads
    pub fn clear_read(&self) {
        self.lock().reads.clear();
    }

    /// Number of reconnects requested so far
    pub fn reconnect_count(&self) -> usize {
        self.lock().reconnects
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn command_code(frame: &[u8]) -> u16 {
    match frame {
        [high, low, ..] => u16::from_be_bytes([*high, *low]),
        _ => 0,
    }
}

/// Ack followed by completed, both echoing the command type of `frame`.
pub fn completed_exchange(frame: &[u8]) -> Vec<Vec<u8>> {
    let command_type = command_code(frame);
    vec![
        response_frame(ResponseType::Ack, command_type, 0).to_vec(),
        response_frame(ResponseType::Completed, command_type, 0).to_vec(),
    ]
}

/// Ack for the command in `frame` followed by a failure report.
pub fn failed_exchange(frame: &[u8], error: CommandError, error_value: u16) -> Vec<Vec<u8>> {
    vec![
        response_frame(ResponseType::Ack, command_code(frame), 0).to_vec(),
        response_frame(ResponseType::Failed, error as u16, error_value).to_vec(),
    ]
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        inner.written.push(data.to_vec());
        if let Some(responder) = inner.responder.as_mut() {
            let replies = responder(data);
            inner.reads.extend(replies);
        }
        Ok(())
    }

    fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        let mut inner = self.lock();
        let Some(mut chunk) = inner.reads.pop_front() else {
            return Ok(Vec::new());
        };
        if chunk.len() > size {
            let rest = chunk.split_off(size);
            inner.reads.push_front(rest);
        }
        Ok(chunk)
    }

    fn reconnect(&mut self) -> Result<()> {
        self.lock().reconnects += 1;
        Ok(())
    }

    fn has_data(&mut self) -> Result<bool> {
        Ok(!self.lock().reads.is_empty())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}
