//! Link session and exchange sequencing against the recording radio.

use crate::mock_hw::{MockRadio, RadioCall, RecordingSink, StepClock};

use propctl::app::commands::Selection;
use propctl::app::events::AppEvent;
use propctl::app::service::Controller;
use propctl::config::{ControllerConfig, RadioSettings};
use propctl::devices::{DeviceClass, MAX_PAYLOAD_SIZE, Payload};
use propctl::link::{ExchangeEngine, ExchangeOutcome, ExchangePhase, LISTEN_PIPE, LinkSession};

fn frame(bytes: &[u8]) -> Payload {
    Payload::from_slice(bytes).unwrap()
}

#[test]
fn init_runs_double_begin_sequence() {
    let config = ControllerConfig::default();
    let mut radio = MockRadio::new();
    let mut session = LinkSession::new();

    assert!(session.init(&mut radio, &config));
    assert_eq!(
        radio.calls,
        vec![
            RadioCall::Begin,
            RadioCall::SetAutoAck(false),
            RadioCall::StartListening,
            RadioCall::StopListening,
            RadioCall::Begin,
            RadioCall::SetAutoAck(true),
            RadioCall::Configure(RadioSettings::default()),
            RadioCall::StartListening,
        ]
    );
}

#[test]
fn select_programs_pipes_for_class() {
    let config = ControllerConfig::default();
    let mut radio = MockRadio::new();
    let mut session = LinkSession::new();

    assert!(session.select(&mut radio, &config, DeviceClass::Glowworm));
    assert_eq!(
        radio.calls,
        vec![
            RadioCall::StopListening,
            RadioCall::SetPayloadSize(4),
            RadioCall::OpenReadingPipe(LISTEN_PIPE, *b"CTRL0"),
            RadioCall::OpenWritingPipe(*b"GLOW3"),
            RadioCall::StartListening,
        ]
    );
    assert_eq!(session.active(), Some(DeviceClass::Glowworm));
}

#[test]
fn reselecting_active_class_is_a_no_op() {
    let config = ControllerConfig::default();
    let mut radio = MockRadio::new();
    let mut session = LinkSession::new();

    session.select(&mut radio, &config, DeviceClass::Bottles);
    radio.clear();
    assert!(!session.select(&mut radio, &config, DeviceClass::Bottles));
    assert!(radio.calls.is_empty());

    assert!(session.select(&mut radio, &config, DeviceClass::Cauldron));
    assert_eq!(radio.last_payload_size(), Some(1));
    assert_eq!(radio.last_writing_pipe(), Some(*b"CAUL2"));
}

#[test]
fn release_clears_active_class() {
    let config = ControllerConfig::default();
    let mut radio = MockRadio::new();
    let mut session = LinkSession::new();

    assert_eq!(session.release(&mut radio), None);
    session.select(&mut radio, &config, DeviceClass::Cauldron);
    assert_eq!(session.release(&mut radio), Some(DeviceClass::Cauldron));
    assert_eq!(session.active(), None);
    assert_eq!(radio.calls.last(), Some(&RadioCall::StartListening));
}

#[test]
fn exchange_writes_then_listens_then_reads() {
    let mut radio = MockRadio::new();
    let clock = StepClock::new(1);
    let mut engine = ExchangeEngine::new(500);

    let report = engine.exchange(&mut radio, &clock, &frame(&[7, 8, 9, 10]));

    assert!(report.succeeded());
    assert_eq!(engine.phase(), ExchangePhase::Succeeded);
    assert_eq!(
        radio.calls,
        vec![
            RadioCall::StopListening,
            RadioCall::Write(vec![7, 8, 9, 10]),
            RadioCall::StartListening,
            RadioCall::Read(4),
        ]
    );
    let ExchangeOutcome::Echo { echo, .. } = report.outcome else {
        panic!("expected echo");
    };
    assert_eq!(echo.as_slice(), &[7, 8, 9, 10]);
}

#[test]
fn exchange_gives_up_at_budget() {
    let mut radio = MockRadio::silent();
    let clock = StepClock::new(7);
    let mut engine = ExchangeEngine::new(100);

    let report = engine.exchange(&mut radio, &clock, &frame(&[1]));

    assert_eq!(engine.phase(), ExchangePhase::TimedOut);
    let ExchangeOutcome::TimedOut { waited_ms } = report.outcome else {
        panic!("expected timeout");
    };
    assert!((100..107).contains(&waited_ms));
    assert!(!radio.calls.iter().any(|c| matches!(c, RadioCall::Read(_))));
}

#[test]
fn controller_release_emits_event_once() {
    let mut ctl = Controller::new(ControllerConfig::default());
    let mut radio = MockRadio::new();
    let clock = StepClock::new(1);
    let mut sink = RecordingSink::new();
    ctl.start(&mut radio, &mut sink);

    ctl.handle_selection(Selection::new(DeviceClass::Bottles, 1), &mut radio, &clock, &mut sink);
    ctl.release(&mut radio, &mut sink);
    ctl.release(&mut radio, &mut sink);

    let released = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::LinkReleased(_)))
        .count();
    assert_eq!(released, 1);
    assert_eq!(ctl.active_class(), None);

    // Next command re-programs the pipes.
    radio.clear();
    ctl.handle_selection(Selection::new(DeviceClass::Bottles, 1), &mut radio, &clock, &mut sink);
    assert_eq!(radio.count(|c| matches!(c, RadioCall::SetPayloadSize(1))), 1);
}

#[test]
fn full_width_frame_echoes_full_width() {
    let mut radio = MockRadio::new();
    let clock = StepClock::new(1);
    let mut engine = ExchangeEngine::new(500);
    let payload = frame(&[0xA5; MAX_PAYLOAD_SIZE]);

    let report = engine.exchange(&mut radio, &clock, &payload);

    assert!(report.succeeded());
    assert_eq!(radio.calls.last(), Some(&RadioCall::Read(MAX_PAYLOAD_SIZE)));
    let ExchangeOutcome::Echo { echo, .. } = report.outcome else {
        panic!("expected echo");
    };
    assert_eq!(echo, payload);
}

#[test]
fn send_reports_write_result_before_the_wait() {
    let mut radio = MockRadio::silent();
    radio.ack = false;
    let clock = StepClock::new(10);
    let mut engine = ExchangeEngine::new(100);

    let sent = engine.send(&mut radio, &clock, &frame(&[3]));
    assert!(!sent.send_ok);
    assert_eq!(engine.phase(), ExchangePhase::AwaitingEcho);
    assert_eq!(radio.calls.last(), Some(&RadioCall::StartListening));

    let report = engine.await_echo(&mut radio, &clock, sent);
    assert!(!report.send_ok);
    assert_eq!(engine.phase(), ExchangePhase::TimedOut);
}
