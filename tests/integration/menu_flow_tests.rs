//! Menu → Controller flow, the way the console front end wires them.

use crate::mock_hw::{MockRadio, RecordingSink, StepClock};

use propctl::app::service::Controller;
use propctl::config::ControllerConfig;
use propctl::devices::{BottlesMode, DeviceClass, DeviceConfig};
use propctl::menu::{Menu, MenuAction, MenuInput, Screen};

/// Feed `inputs` and route the resulting actions like `main` does.
fn drive(
    menu: &mut Menu,
    ctl: &mut Controller,
    radio: &mut MockRadio,
    clock: &StepClock,
    sink: &mut RecordingSink,
    inputs: &[MenuInput],
) -> Vec<MenuAction> {
    let mut actions = Vec::new();
    for &input in inputs {
        let action = menu.handle(input);
        match action {
            MenuAction::Back(_) => ctl.release(radio, sink),
            MenuAction::Select(sel) => {
                ctl.handle_selection(sel, radio, clock, sink);
            }
            _ => {}
        }
        actions.push(action);
    }
    actions
}

#[test]
fn open_bottles_pick_red_and_leave() {
    use MenuInput::{Down, Enter, Up};

    let mut menu = Menu::new();
    let mut ctl = Controller::new(ControllerConfig::default());
    let mut radio = MockRadio::new();
    let clock = StepClock::new(1);
    let mut sink = RecordingSink::new();
    ctl.start(&mut radio, &mut sink);

    let actions = drive(
        &mut menu,
        &mut ctl,
        &mut radio,
        &clock,
        &mut sink,
        &[Down, Enter, Down, Down, Down, Enter, Up, Up, Up, Enter],
    );

    assert_eq!(actions[1], MenuAction::Open(DeviceClass::Bottles));
    assert!(matches!(actions[5], MenuAction::Select(s) if s.index == 3));
    assert_eq!(actions[9], MenuAction::Back(DeviceClass::Bottles));
    assert_eq!(menu.screen(), Screen::Main);

    assert_eq!(
        ctl.device(DeviceClass::Bottles),
        DeviceConfig::Bottles(propctl::devices::BottlesConfig {
            mode: BottlesMode::Red
        })
    );
    assert_eq!(ctl.active_class(), None);
    assert_eq!(ctl.stats().exchanges, 1);
}

#[test]
fn exit_from_main_menu() {
    let mut menu = Menu::new();
    menu.handle(MenuInput::Down);
    menu.handle(MenuInput::Up);
    assert_eq!(menu.handle(MenuInput::Enter), MenuAction::Exit);
}
