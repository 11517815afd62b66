//! Prop controller firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │   Nrf24 (RadioPort)  MonotonicClock  LogEventSink        │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │          Controller (pure logic)                   │  │
//! │  │  transitions · link session · send/echo exchange   │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  Menu (console front end)                                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The operator drives the menu over the serial console: `w` / `s` move
//! the cursor, an empty line selects, `?` prints link statistics as JSON.
#![deny(unused_must_use)]

use std::io::BufRead;

use anyhow::Result;
use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::{
    config::Config as SpiConfig, SpiDeviceDriver, SpiDriver, SpiDriverConfig,
};
use esp_idf_svc::hal::units::FromValueType;
use log::{info, warn};

use propctl::adapters::log_sink::LogEventSink;
use propctl::adapters::nrf24::Nrf24;
use propctl::adapters::time::MonotonicClock;
use propctl::app::service::Controller;
use propctl::config::ControllerConfig;
use propctl::diagnostics;
use propctl::menu::{Menu, MenuAction, MenuInput};

// ── Wiring (ESP32-S3, SPI2) ───────────────────────────────────
//
//   nRF24   ESP32-S3
//   SCK  ── GPIO12
//   MOSI ── GPIO11
//   MISO ── GPIO13
//   CSN  ── GPIO10
//   CE   ── GPIO9

/// nRF24L01+ tops out at 10 MHz; 8 MHz keeps margin on flying leads.
const SPI_BAUD_MHZ: u32 = 8;

fn draw(menu: &Menu) {
    let screen = menu.screen();
    println!();
    println!("== {} ==", screen.title());
    for (i, label) in screen.labels().enumerate() {
        let marker = if i == menu.cursor() { '>' } else { ' ' };
        println!("{marker} {i:2} {label}");
    }
}

fn parse_input(line: &str) -> Option<MenuInput> {
    match line.trim() {
        "" => Some(MenuInput::Enter),
        "w" | "k" => Some(MenuInput::Up),
        "s" | "j" => Some(MenuInput::Down),
        _ => None,
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    diagnostics::install_panic_handler();

    info!("propctl v{}", env!("CARGO_PKG_VERSION"));

    let config = ControllerConfig::default();
    config.validate().map_err(propctl::error::Error::from)?;

    // ── 2. Radio hardware ─────────────────────────────────────
    let p = Peripherals::take()?;
    let bus = SpiDriver::new(
        p.spi2,
        p.pins.gpio12,
        p.pins.gpio11,
        Some(p.pins.gpio13),
        &SpiDriverConfig::new(),
    )?;
    let spi = SpiDeviceDriver::new(
        bus,
        Some(p.pins.gpio10),
        &SpiConfig::new().baudrate(SPI_BAUD_MHZ.MHz().into()),
    )?;
    let ce = PinDriver::output(p.pins.gpio9)?;

    let mut radio = Nrf24::new(spi, ce, Delay::new_default());
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();

    // ── 3. Controller ─────────────────────────────────────────
    let mut controller = Controller::new(config);
    controller.start(&mut radio, &mut sink);

    // ── 4. Menu loop ──────────────────────────────────────────
    let mut menu = Menu::new();
    draw(&menu);

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim() == "?" {
            match serde_json::to_string(controller.stats()) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!("stats: {}", e),
            }
            continue;
        }
        let Some(input) = parse_input(&line) else {
            warn!(
                "unknown key {:?} (w/s to move, enter to select, ? for stats)",
                line.trim()
            );
            continue;
        };

        match menu.handle(input) {
            MenuAction::None | MenuAction::Open(_) => {}
            MenuAction::Back(_) => controller.release(&mut radio, &mut sink),
            MenuAction::Select(sel) => {
                controller.handle_selection(sel, &mut radio, &clock, &mut sink);
            }
            MenuAction::Exit => break,
        }
        draw(&menu);
    }

    let stats = controller.stats();
    info!(
        "exit: {} exchanges, {}% echoed, {} timeouts",
        stats.exchanges,
        stats.success_percent(),
        stats.timeouts
    );
    Ok(())
}
