//! Engine tests for the canonical request shapes, resync behavior, and
//! data mode, driven over a scripted transport.

mod common;

use std::time::Duration;

use bc127_core::protocol::{AudioCommand, BaudRate, Bc127, Bc127Error, BleRole, ClassicRole};
use common::MockTransport;
use pretty_assertions::assert_eq;

fn engine_with(response: &[u8]) -> Bc127<MockTransport> {
    let mut transport = MockTransport::synced();
    transport.push(response);
    Bc127::new(transport)
}

#[test]
fn test_std_cmd_success() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.std_cmd("RESTORE").is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rRESTORE\r");
}

#[test]
fn test_std_cmd_module_error() {
    let mut module = engine_with(b"ERROR\n\r");
    assert!(matches!(module.std_cmd("RESTORE"), Err(Bc127Error::Module)));
}

#[test]
fn test_std_cmd_timeout_when_silent() {
    let mut module = engine_with(b"");
    assert!(matches!(module.std_cmd("RESTORE"), Err(Bc127Error::Timeout)));
}

#[test]
fn test_std_cmd_discards_unrecognized_lines() {
    let mut module = engine_with(b"Melody Audio V5.0 RC9\n\rOK\n\r");
    assert!(module.std_cmd("RESTORE").is_ok());
}

#[test]
fn test_resync_consumes_stale_terminal_line() {
    // A leftover OK from a previous exchange must not be read as this
    // command's response.
    let mut transport = MockTransport::new();
    transport.push(b"OK\n\r");
    transport.push(b"ERROR\n\r");
    let mut module = Bc127::new(transport);
    assert!(matches!(module.std_cmd("RESTORE"), Err(Bc127Error::Module)));
}

#[test]
fn test_resync_consumes_partial_garbage() {
    // Garbage without a terminator merges into the resync line and is
    // discarded with it.
    let mut transport = MockTransport::new();
    transport.push(b"GARB");
    transport.push(b"ERROR\n\r");
    transport.push(b"OK\n\r");
    let mut module = Bc127::new(transport);
    assert!(module.std_cmd("RESTORE").is_ok());
}

#[test]
fn test_resync_timeout_aborts_before_sending() {
    let mut module = Bc127::new(MockTransport::new());
    assert!(matches!(
        module.std_cmd("RESTORE"),
        Err(Bc127Error::ResyncTimeout)
    ));
    // Only the resync terminator went out; the command never did.
    assert_eq!(module.transport_mut().sent_str(), "\r");
}

#[test]
fn test_std_set_param_wire_format() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.std_set_param("AUTOCONN", "1").is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rSET AUTOCONN=1\r");
}

#[test]
fn test_std_get_param_value_attached_to_terminal() {
    let mut module = engine_with(b"LOCAL_ADDR=20FABB010272\n\rOK\n\r");
    let value = module.std_get_param("LOCAL_ADDR").unwrap();
    assert_eq!(value, Some("20FABB010272".to_string()));
    assert_eq!(module.transport_mut().sent_str(), "\rGET LOCAL_ADDR\r");
}

#[test]
fn test_std_get_param_empty_result_is_legal() {
    let mut module = engine_with(b"OK\n\r");
    assert_eq!(module.std_get_param("AUTOCONN").unwrap(), None);
}

#[test]
fn test_std_get_param_value_line_does_not_terminate() {
    // The terminal line is authoritative: a captured value followed by
    // ERROR reports the error, not the value.
    let mut module = engine_with(b"BAUD=9600\n\rERROR\n\r");
    assert!(matches!(
        module.std_get_param("BAUD"),
        Err(Bc127Error::Module)
    ));
}

#[test]
fn test_local_address_query() {
    let mut module = engine_with(b"LOCAL_ADDR=20FABB010272\n\rOK\n\r");
    assert_eq!(
        module.local_address().unwrap(),
        Some("20FABB010272".to_string())
    );
}

#[test]
fn test_reset_waits_for_boot_banner() {
    let mut module = engine_with(
        b"BlueCreation Copyright 2013\n\rMelody Audio V5.0 RC9\n\rReady\n\r",
    );
    assert!(module.reset().is_ok());
}

#[test]
fn test_write_config_sends_write() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.write_config().is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rWRITE\r");
}

#[test]
fn test_set_baud_rate_surfaces_raw_timeout() {
    // A garbled half-line at the old speed never completes; the engine
    // must report the timeout, not upgrade it to success.
    let mut transport = MockTransport::synced();
    transport.push(&[0xF8, 0x03, 0x9C]);
    let mut module = Bc127::new(transport);
    let err = module.set_baud_rate(BaudRate::Baud115200).unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(module.transport_mut().sent_str(), "\rSET BAUD=115200\r");
}

#[test]
fn test_set_baud_rate_confirmed_means_no_change() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.set_baud_rate(BaudRate::Baud9600).is_ok());
}

#[test]
fn test_ble_role_tokens_on_the_wire() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.set_ble_role(BleRole::Central).is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rSET BLE_ROLE=2\r");
}

#[test]
fn test_advertising_commands() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.set_advertising(true).is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rADVERTISING ON\r");

    let mut module = engine_with(b"OK\n\r");
    assert!(module.set_advertising(false).is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rADVERTISING OFF\r");
}

#[test]
fn test_classic_role_source() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.set_classic_role(ClassicRole::Source).is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rSET CLASSIC_ROLE=1\r");
}

#[test]
fn test_music_command() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.music_command(AudioCommand::Pause).is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rMUSIC PAUSE\r");
}

#[test]
fn test_enter_data_mode() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.enter_data_mode().is_ok());
    assert_eq!(module.transport_mut().sent_str(), "\rENTER_DATA\r");
}

#[test]
fn test_exit_data_mode_writes_bare_escape_token() {
    // No resync and no terminator: the link is passing data through, so
    // anything beyond the token would reach the remote device.
    let mut transport = MockTransport::new();
    transport.push(b"OK\n\r");
    let mut module = Bc127::new(transport);
    assert!(module.exit_data_mode(Some(Duration::ZERO)).is_ok());
    assert_eq!(module.transport_mut().sent_str(), "$$$$");
}

#[test]
fn test_exit_data_mode_times_out_without_ack() {
    let mut module = Bc127::new(MockTransport::new());
    assert!(matches!(
        module.exit_data_mode(Some(Duration::ZERO)),
        Err(Bc127Error::Timeout)
    ));
}

#[test]
fn test_back_to_back_operations_do_not_leak_responses() {
    let mut module = engine_with(b"OK\n\r");
    assert!(module.std_cmd("RESTORE").is_ok());

    // Stale trailing garbage from the first exchange, then the second
    // module response after its own resync line.
    module.transport_mut().push(b"STRAGGLER\n\r");
    module.transport_mut().push(b"ERROR\n\r");
    assert!(matches!(module.std_cmd("WRITE"), Err(Bc127Error::Module)));
}
