//! TinyK Exchange Tests
//!
//! Drives a [`TinyK`] session against a scripted [`MockTransport`] to check:
//! - Frame layout of sent commands
//! - Ack/terminal ordering of received responses
//! - Resend budget on malformed frames
//!
//! Run with: `cargo test --test protocol_exchange`

use tinyk_io::protocol::response_frame;
use tinyk_io::{
    CommandError, CommandType, Error, MockTransport, ResponseType, RobotPosition, TinyK,
    TinyKCommand,
};

// ============================================================================
// Helpers
// ============================================================================

fn session() -> (TinyK<MockTransport>, MockTransport) {
    // resend warnings show up with RUST_LOG=warn
    let _ = env_logger::builder().is_test(true).try_init();
    let transport = MockTransport::new();
    (TinyK::new(transport.clone()), transport)
}

// ============================================================================
// Sending
// ============================================================================

#[test]
fn test_first_commands_are_framed_with_sequence_one() {
    let cases = [
        (TinyKCommand::move_forward(5), [0x00, 0x08, 0x00, 0x05, 0x00, 0x01, 0xFF]),
        (TinyKCommand::rotate_counter_clockwise(16), [0x00, 0x05, 0x00, 0x10, 0x00, 0x01, 0xFF]),
        (TinyKCommand::initialize(), [0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xFF]),
        (
            TinyKCommand::move_to_position(RobotPosition::DriveAround),
            [0x00, 0x0C, 0x00, 0x01, 0x00, 0x01, 0xFF],
        ),
    ];

    for (command, expected) in cases {
        let (mut tinyk, transport) = session();
        tinyk.execute(command).unwrap();
        assert_eq!(transport.get_written(), vec![expected.to_vec()]);
    }
}

// ============================================================================
// Receiving
// ============================================================================

#[test]
fn test_ack_then_completed() {
    let (mut tinyk, transport) = session();
    transport.inject_read(&[
        0x00, 0x01, 0x00, 0x0A, 0x00, 0x00, 0xFF, 0x00, 0x03, 0x00, 0x0A, 0x00, 0x00, 0xFF,
    ]);

    tinyk.execute(TinyKCommand::climb(5)).unwrap();
    let first = tinyk.wait_for_response().unwrap();
    let second = tinyk.wait_for_response().unwrap();

    assert_eq!(first.response_type, ResponseType::Ack);
    assert_eq!(second.response_type, ResponseType::Completed);
    assert_eq!(first.command_type(), Some(CommandType::Climb));
    assert_eq!(second.command_type(), Some(CommandType::Climb));
    assert_eq!(transport.get_written().len(), 1);
}

#[test]
fn test_failed_carries_error_and_value() {
    let (mut tinyk, transport) = session();
    let right = u16::from(CommandType::MoveRight);
    transport.inject_read(&response_frame(ResponseType::Ack, right, 0));
    transport.inject_read(&[0x00, 0x02, 0x00, 0x03, 0x00, 0x05, 0xFF]);

    tinyk.execute(TinyKCommand::move_right(10)).unwrap();
    tinyk.wait_for_response().unwrap();
    let failed = tinyk.wait_for_response().unwrap();

    assert_eq!(failed.response_type, ResponseType::Failed);
    assert_eq!(failed.error(), Some(CommandError::ObstacleDetectedRight));
    assert_eq!(failed.error_value, 5);
}

#[test]
fn test_responder_answers_every_command() {
    let transport = MockTransport::auto_complete();
    let mut tinyk = TinyK::new(transport.clone());

    for command in [TinyKCommand::initialize(), TinyKCommand::move_left(15)] {
        let command_type = command.command_type;
        tinyk.execute(command).unwrap();
        assert!(tinyk.wait_for_response().unwrap().is_ack());
        let terminal = tinyk.wait_for_response().unwrap();
        assert_eq!(terminal.response_type, ResponseType::Completed);
        assert_eq!(terminal.command_type(), Some(command_type));
    }
    assert_eq!(transport.get_written().len(), 2);
}

// ============================================================================
// Resend
// ============================================================================

#[test]
fn test_short_frame_is_resent_once() {
    let (mut tinyk, transport) = session();
    let forward = u16::from(CommandType::MoveForward);

    tinyk.execute(TinyKCommand::move_forward(5)).unwrap();
    tinyk.execute(TinyKCommand::move_forward(7)).unwrap();
    transport.clear_written();

    transport.inject_read(&[0x00, 0x01, 0x00, 0x08, 0x00, 0x00]);
    transport.inject_read(&response_frame(ResponseType::Ack, forward, 0));

    let response = tinyk.wait_for_response().unwrap();
    assert!(response.is_ack());
    assert_eq!(response.command_type(), Some(CommandType::MoveForward));

    // resent under the previous sequence number, not a fresh one
    let written = transport.get_written();
    assert_eq!(written, vec![vec![0x00, 0x08, 0x00, 0x07, 0x00, 0x02, 0xFF]]);
    assert_eq!(transport.reconnect_count(), 1);
    assert_eq!(tinyk.sequence_number(), 3);
}

#[test]
fn test_exhausted_ttl_is_fatal_without_sending() {
    let (mut tinyk, transport) = session();

    tinyk
        .execute(TinyKCommand::move_forward(5).with_ttl(1))
        .unwrap();
    transport.inject_read(&[0x00, 0x01, 0x00, 0x08, 0x00, 0x00]);

    let err = tinyk.wait_for_response().unwrap_err();
    assert!(matches!(err, Error::ProtocolExhausted(_)));
    assert_eq!(transport.get_written().len(), 1);
    assert_eq!(transport.reconnect_count(), 0);
}

#[test]
fn test_default_ttl_allows_two_resends() {
    let (mut tinyk, transport) = session();

    tinyk.execute(TinyKCommand::initialize()).unwrap();
    // silent peer: every read comes back empty

    let err = tinyk.wait_for_response().unwrap_err();
    assert!(matches!(err, Error::ProtocolExhausted(_)));
    assert_eq!(transport.get_written().len(), 3);
    assert_eq!(transport.reconnect_count(), 2);
}
