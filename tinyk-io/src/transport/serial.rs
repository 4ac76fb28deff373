//! Serial transport implementation

use super::Transport;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

/// Serial port settings for the TinyK link
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyTHS1")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Attempts per send/read before the error is returned
    pub max_retries: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyTHS1".to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 10_000,
            max_retries: 10,
        }
    }
}

/// Serial transport for UART communication
pub struct SerialTransport {
    config: SerialConfig,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port
    pub fn open(config: SerialConfig) -> Result<Self> {
        let port = Self::open_port(&config)?;
        log::info!(
            "Opened serial port: {} at {} baud",
            config.port,
            config.baud_rate
        );
        Ok(SerialTransport { config, port })
    }

    fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()?;

        // Give the UART a moment before dropping stale bytes
        thread::sleep(Duration::from_millis(200));
        port.clear(ClearBuffer::All)?;
        Ok(port)
    }

    fn write_frame(&mut self, data: &[u8]) -> Result<()> {
        self.port.clear(ClearBuffer::All)?;
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_into(&mut self, buffer: &mut Vec<u8>, size: usize) -> Result<()> {
        let mut chunk = [0u8; 64];
        while buffer.len() < size {
            let wanted = (size - buffer.len()).min(chunk.len());
            match self.port.read(&mut chunk[..wanted]) {
                Ok(0) => break,
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        log::debug!("Serial send: {:02X?}", data);
        let mut attempt = 0;
        loop {
            match self.write_frame(data) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    log::warn!("Serial write failed (attempt {}): {}", attempt, e);
                    if attempt >= self.config.max_retries {
                        return Err(e);
                    }
                    self.reconnect()?;
                }
            }
        }
    }

    fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(size);
        let mut attempt = 0;
        loop {
            match self.read_into(&mut buffer, size) {
                Ok(()) => {
                    log::debug!("Serial read {} of {} bytes: {:02X?}", buffer.len(), size, buffer);
                    return Ok(buffer);
                }
                Err(e) => {
                    attempt += 1;
                    log::warn!("Serial read failed (attempt {}): {}", attempt, e);
                    if attempt >= self.config.max_retries {
                        return Err(e);
                    }
                    buffer.clear();
                    self.reconnect()?;
                }
            }
        }
    }

    fn reconnect(&mut self) -> Result<()> {
        log::info!("Reconnecting serial port {}", self.config.port);
        self.port = Self::open_port(&self.config)?;
        Ok(())
    }

    fn has_data(&mut self) -> Result<bool> {
        Ok(self.port.bytes_to_read()? > 0)
    }
}
