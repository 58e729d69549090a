//! Snapshot tests for error and exit message formatting.
//!
//! These messages end up in the host's log; keep them stable.

use dr2_hud_telemetry::{ConfigError, DecodeError, LoopExit, ReceiverError, SocketStage};
use insta::assert_snapshot;
use std::io;

mod receiver_error_snapshots {
    use super::*;

    #[test]
    fn test_already_started() {
        assert_snapshot!(ReceiverError::AlreadyStarted.to_string(), @"telemetry receiver already started");
    }

    #[test]
    fn test_not_started() {
        assert_snapshot!(ReceiverError::NotStarted.to_string(), @"telemetry receiver not started");
    }

    #[test]
    fn test_socket_bind_failed() {
        let err = ReceiverError::socket_init(
            SocketStage::Bind,
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );
        assert_snapshot!(err.to_string(), @"telemetry socket bind failed: address in use");
    }

    #[test]
    fn test_socket_configure_failed() {
        let err = ReceiverError::socket_init(
            SocketStage::Configure,
            io::Error::new(io::ErrorKind::InvalidInput, "zero timeout"),
        );
        assert_snapshot!(err.to_string(), @"telemetry socket configure failed: zero timeout");
    }
}

mod decode_error_snapshots {
    use super::*;

    #[test]
    fn test_wrong_size() {
        let err = DecodeError::WrongSize {
            expected: 264,
            actual: 100,
        };
        assert_snapshot!(err.to_string(), @"invalid packet size: expected 264 bytes, got 100");
    }

    #[test]
    fn test_config_invalid() {
        let err = ConfigError::invalid("max_invalid_packets must be greater than 0");
        assert_snapshot!(err.to_string(), @"invalid configuration: max_invalid_packets must be greater than 0");
    }
}

mod loop_exit_snapshots {
    use super::*;

    #[test]
    fn test_shutdown() {
        assert_snapshot!(LoopExit::Shutdown.to_string(), @"shutdown");
    }

    #[test]
    fn test_aborted() {
        assert_snapshot!(LoopExit::Aborted.to_string(), @"receive aborted");
    }

    #[test]
    fn test_too_many_invalid() {
        assert_snapshot!(
            LoopExit::TooManyInvalidPackets { count: 10 }.to_string(),
            @"10 consecutive invalid packets"
        );
    }
}
