//! TinyK session: sequencing and resend on top of a transport

use crate::error::{Error, Result};
use crate::protocol::{TinyKCommand, TinyKResponse, FRAME_SIZE};
use crate::transport::Transport;

/// Which frame of the two-frame exchange is expected next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ack,
    /// A resend happened after the ack; the peer replays the ack first
    ReplayedAck,
    Terminal,
}

/// A session with the drive controller
///
/// Owns the transport exclusively. Commands are numbered from 1; a malformed
/// or missing response triggers a reconnect and a resend of the last command
/// under its original sequence number until the command's `ttl` is spent.
pub struct TinyK<T: Transport> {
    transport: T,
    current_seq: u16,
    previous_seq: Option<u16>,
    last_command: Option<TinyKCommand>,
    phase: Phase,
}

impl<T: Transport> TinyK<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            current_seq: 1,
            previous_seq: None,
            last_command: None,
            phase: Phase::Ack,
        }
    }

    /// Sequence number the next command will be sent with
    pub fn sequence_number(&self) -> u16 {
        self.current_seq
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a command under the next sequence number
    pub fn execute(&mut self, command: TinyKCommand) -> Result<()> {
        let seq = self.current_seq;
        let mut command = command;
        self.send(&mut command, seq)?;
        self.last_command = Some(command);
        self.previous_seq = Some(seq);
        self.current_seq = seq.checked_add(1).unwrap_or(1);
        self.phase = Phase::Ack;
        Ok(())
    }

    /// True if the peer has bytes waiting
    pub fn has_response_arrived(&mut self) -> Result<bool> {
        self.transport.has_data()
    }

    /// Block until the next well-formed response arrives.
    ///
    /// Malformed frames never reach the caller: they are answered with a
    /// resend. If the resend happens while the terminal frame is awaited, the
    /// replayed ack is consumed here and the replayed terminal frame returned.
    pub fn wait_for_response(&mut self) -> Result<TinyKResponse> {
        loop {
            let frame = self.transport.read(FRAME_SIZE)?;
            log::debug!("TinyK received: {:02X?}", frame);

            let response = match TinyKResponse::decode(&frame) {
                Ok(response) => response,
                Err(e) if e.is_malformed_frame() => {
                    log::warn!("TinyK: malformed response ({}), resending last command", e);
                    self.resend_last_command()?;
                    if self.phase == Phase::Terminal {
                        self.phase = Phase::ReplayedAck;
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.phase == Phase::ReplayedAck {
                if !response.is_ack() {
                    return Err(Error::UnexpectedResponse(format!(
                        "resent command was answered with {:?} instead of an ack",
                        response.response_type
                    )));
                }
                log::debug!("TinyK: resent command acknowledged again");
                self.phase = Phase::Terminal;
                continue;
            }

            self.phase = if response.is_ack() {
                Phase::Terminal
            } else {
                Phase::Ack
            };
            log::debug!("TinyK response: {:?}", response);
            return Ok(response);
        }
    }

    fn resend_last_command(&mut self) -> Result<()> {
        let Some(mut command) = self.last_command else {
            return Err(Error::ProtocolExhausted(
                "no command sent previously".to_string(),
            ));
        };
        let Some(seq) = self.previous_seq else {
            return Err(Error::ProtocolExhausted(
                "previous sequence number not set".to_string(),
            ));
        };
        if command.ttl == 0 {
            return Err(Error::ProtocolExhausted(format!(
                "ttl of {:?} exceeded",
                command.command_type
            )));
        }

        log::info!("TinyK: resending {:?} as #{}", command.command_type, seq);
        self.transport.reconnect()?;
        self.send(&mut command, seq)?;
        self.last_command = Some(command);
        Ok(())
    }

    fn send(&mut self, command: &mut TinyKCommand, seq: u16) -> Result<()> {
        let frame = command.encode(seq);
        log::debug!("TinyK send: {:02X?}", frame);
        self.transport.send(&frame)?;
        command.consume_ttl();
        Ok(())
    }
}
