//! Integration tests for the Selection → Controller → RadioPort pipeline.
//!
//! These run on the host and drive the full command path, from a menu
//! selection down to the bytes handed to the transceiver, against the
//! recording mocks in `mock_hw`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::mock_hw::{MockRadio, RadioCall, RecordingSink, Reply, StepClock};

use propctl::app::commands::{Command, Selection};
use propctl::app::events::AppEvent;
use propctl::app::ports::{EventSink, RadioPort};
use propctl::app::service::Controller;
use propctl::config::{Address, ControllerConfig, PowerLevel, RadioSettings};
use propctl::devices::{
    Antenna, BottlesCommand, BottlesMode, CauldronMode, DeviceClass, DeviceConfig, GlowwormConfig,
};
use propctl::link::ExchangeOutcome;

fn make_controller() -> (Controller, MockRadio, StepClock, RecordingSink) {
    let mut ctl = Controller::new(ControllerConfig::default());
    let mut radio = MockRadio::new();
    let mut sink = RecordingSink::new();
    ctl.start(&mut radio, &mut sink);
    radio.clear();
    sink.clear();
    (ctl, radio, StepClock::new(1), sink)
}

fn select(
    ctl: &mut Controller,
    radio: &mut MockRadio,
    clock: &StepClock,
    sink: &mut RecordingSink,
    class: DeviceClass,
    index: u8,
) -> Option<propctl::app::service::CommandResult> {
    ctl.handle_selection(Selection::new(class, index), radio, clock, sink)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_reports_channel_and_chip() {
    let mut ctl = Controller::new(ControllerConfig::default());
    let mut radio = MockRadio::new();
    let mut sink = RecordingSink::new();
    ctl.start(&mut radio, &mut sink);

    assert_eq!(
        sink.events,
        vec![AppEvent::Started {
            channel: 108,
            chip_ok: true
        }]
    );
    assert!(radio.calls.contains(&RadioCall::Configure(ctl.config().radio)));
    assert_eq!(ctl.config().radio.power, PowerLevel::Max);
    assert!(ctl.active_class().is_none());
}

#[test]
fn missing_chip_is_reported_but_not_fatal() {
    let mut ctl = Controller::new(ControllerConfig::default());
    let mut radio = MockRadio::silent();
    radio.chip_present = false;
    let mut sink = RecordingSink::new();
    ctl.start(&mut radio, &mut sink);
    assert!(sink.has(|e| matches!(e, AppEvent::Started { chip_ok: false, .. })));

    let clock = StepClock::new(5);
    let res = select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 2);
    assert!(!res.expect("command should run").succeeded());
}

// ── Bottles ───────────────────────────────────────────────────

#[test]
fn bottles_rigging_sends_one_byte_and_succeeds() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();

    let res = select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 2)
        .expect("Rigging is a command");

    assert!(res.succeeded());
    assert_eq!(radio.writes(), vec![vec![BottlesMode::Rigging as u8]]);
    assert_eq!(radio.last_payload_size(), Some(1));
    assert_eq!(radio.last_writing_pipe(), Some(*b"BOTL1"));
    assert!(sink.has(|e| matches!(e, AppEvent::Sending { bytes: 1, .. })));
    assert!(sink.has(|e| matches!(
        e,
        AppEvent::EchoReceived {
            class: DeviceClass::Bottles,
            bytes: 1,
            echo: Some(_),
            ..
        }
    )));
}

#[test]
fn bottles_same_mode_twice_turns_off() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 3);
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 3);

    assert!(ctl.device(DeviceClass::Bottles).is_off());
    assert_eq!(radio.writes(), vec![vec![2], vec![0]]);
}

// ── Cauldron ──────────────────────────────────────────────────

#[test]
fn cauldron_toggles_accumulate_in_bitmask() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Cauldron, 3); // Fan
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Cauldron, 5); // Glow

    let DeviceConfig::Cauldron(c) = ctl.device(DeviceClass::Cauldron) else {
        panic!("wrong class");
    };
    assert_eq!(c.mode, CauldronMode::FAN | CauldronMode::GLOW);
    assert_eq!(radio.writes().last(), Some(&vec![0b101]));

    // Toggle all flips every bit.
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Cauldron, 2);
    assert_eq!(radio.writes().last(), Some(&vec![0b010]));
}

// ── Glowworm ──────────────────────────────────────────────────

#[test]
fn glowworm_colour_keeps_antenna() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Glowworm, 2); // Toggle both
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Glowworm, 10); // Pink

    assert_eq!(
        ctl.device(DeviceClass::Glowworm),
        DeviceConfig::Glowworm(GlowwormConfig {
            antenna: Antenna::BOTH,
            r: 0xff,
            g: 0x0a,
            b: 0x50,
        })
    );
    assert_eq!(radio.writes().last(), Some(&vec![3, 0xff, 0x0a, 0x50]));
    assert_eq!(radio.last_payload_size(), Some(4));
}

// ── Timeouts and optimistic state ─────────────────────────────

#[test]
fn timeout_keeps_new_state() {
    let (mut ctl, _, clock, mut sink) = make_controller();
    let mut radio = MockRadio::silent();

    let res = select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 4)
        .expect("White is a command");

    assert!(!res.succeeded());
    assert!(matches!(
        res.report.outcome,
        ExchangeOutcome::TimedOut { waited_ms } if waited_ms >= 500
    ));
    assert!(sink.has(|e| matches!(
        e,
        AppEvent::TimedOut {
            class: DeviceClass::Bottles,
            timeout_ms: 500
        }
    )));
    assert_eq!(
        ctl.device(DeviceClass::Bottles),
        DeviceConfig::Bottles(propctl::devices::BottlesConfig {
            mode: BottlesMode::White
        })
    );
    assert_eq!(ctl.stats().timeouts, 1);
}

#[test]
fn unacked_write_still_waits_for_echo() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    radio.ack = false;

    let res = select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Cauldron, 3)
        .expect("Fan is a command");

    assert!(!res.report.send_ok);
    assert!(res.succeeded());
    assert!(sink.has(|e| *e == AppEvent::Sent { ok: false }));
    assert_eq!(ctl.stats().send_failures, 1);
    assert_eq!(ctl.stats().echoes, 1);
}

#[test]
fn garbled_echo_still_counts_as_success() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    radio.reply = Reply::Bytes(vec![0x09]);

    let res = select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 2)
        .expect("Rigging is a command");

    assert!(res.succeeded());
    assert!(sink.has(|e| matches!(e, AppEvent::EchoReceived { echo: None, .. })));
}

#[test]
fn round_trip_reflects_echo_delay() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    radio.reply = Reply::Echo { polls: 3 };

    let res = select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 2)
        .expect("Rigging is a command");
    assert_eq!(res.report.rtt_ms(), Some(3));
    assert_eq!(ctl.stats().last_rtt_ms, Some(3));
}

// ── Ignored selections ────────────────────────────────────────

#[test]
fn back_and_out_of_range_are_ignored() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();

    assert!(select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Bottles, 0).is_none());
    assert!(select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Cauldron, 6).is_none());
    assert!(select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Glowworm, 200).is_none());

    assert!(radio.calls.is_empty(), "ignored selections must not touch the radio");
    assert_eq!(ctl.stats().ignored, 3);
    assert_eq!(ctl.stats().exchanges, 0);
    assert!(sink.has(|e| matches!(e, AppEvent::CommandIgnored(s) if s.index == 200)));
    for class in DeviceClass::ALL {
        assert!(ctl.device(class).is_off());
    }
}

// ── Isolation between classes ─────────────────────────────────

#[test]
fn classes_keep_independent_state() {
    let (mut ctl, mut radio, clock, mut sink) = make_controller();
    ctl.execute(
        Command::Bottles(BottlesCommand::Red),
        &mut radio,
        &clock,
        &mut sink,
    );
    select(&mut ctl, &mut radio, &clock, &mut sink, DeviceClass::Cauldron, 4); // Fire

    assert!(!ctl.device(DeviceClass::Bottles).is_off());
    assert!(!ctl.device(DeviceClass::Cauldron).is_off());
    assert!(ctl.device(DeviceClass::Glowworm).is_off());
    assert_eq!(ctl.active_class(), Some(DeviceClass::Cauldron));
    assert_eq!(radio.last_writing_pipe(), Some(*b"CAUL2"));
}

// ── Event timing ──────────────────────────────────────────────

type Journal = Rc<RefCell<Vec<&'static str>>>;

/// Radio that notes writes and polls in a journal shared with the sink.
struct JournalRadio {
    journal: Journal,
    polls_left: usize,
}

impl RadioPort for JournalRadio {
    fn begin(&mut self) -> bool {
        true
    }
    fn set_auto_ack(&mut self, _enabled: bool) {}
    fn configure(&mut self, _settings: &RadioSettings) {}
    fn set_payload_size(&mut self, _size: usize) {}
    fn open_reading_pipe(&mut self, _slot: u8, _address: &Address) {}
    fn open_writing_pipe(&mut self, _address: &Address) {}
    fn start_listening(&mut self) {}
    fn stop_listening(&mut self) {}
    fn write(&mut self, _payload: &[u8]) -> bool {
        self.journal.borrow_mut().push("write");
        false
    }
    fn available(&mut self) -> bool {
        self.journal.borrow_mut().push("poll");
        self.polls_left = self.polls_left.saturating_sub(1);
        self.polls_left == 0
    }
    fn read(&mut self, _buf: &mut [u8]) {
        self.journal.borrow_mut().push("read");
    }
}

struct JournalSink(Journal);

impl EventSink for JournalSink {
    fn emit(&mut self, event: &AppEvent) {
        let entry = match event {
            AppEvent::Sending { .. } => "sending",
            AppEvent::Sent { .. } => "sent",
            AppEvent::EchoReceived { .. } => "echo",
            AppEvent::TimedOut { .. } => "timeout",
            _ => return,
        };
        self.0.borrow_mut().push(entry);
    }
}

#[test]
fn write_result_is_reported_before_the_echo_wait() {
    let journal = Journal::default();
    let mut radio = JournalRadio {
        journal: Rc::clone(&journal),
        polls_left: 3,
    };
    let mut sink = JournalSink(Rc::clone(&journal));
    let clock = StepClock::new(1);
    let mut ctl = Controller::new(ControllerConfig::default());

    ctl.handle_selection(
        Selection::new(DeviceClass::Bottles, 2),
        &mut radio,
        &clock,
        &mut sink,
    );

    assert_eq!(
        *journal.borrow(),
        ["sending", "write", "sent", "poll", "poll", "poll", "read", "echo"]
    );
}
