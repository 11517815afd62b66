//! nRF24L01+ transceiver adapter.
//!
//! Implements [`RadioPort`] on top of the `embedded-hal` 1.0 traits, so
//! the same driver runs on the ESP-IDF SPI master and on a fake register
//! file in tests.
//!
//! ## SPI protocol
//!
//! Every access is one chip-select transaction: a command byte, then data.
//!
//! | Command        | Byte            | Data                    |
//! |----------------|-----------------|-------------------------|
//! | R_REGISTER     | `0x00 \| reg`   | read 1–5 bytes          |
//! | W_REGISTER     | `0x20 \| reg`   | write 1–5 bytes         |
//! | R_RX_PAYLOAD   | `0x61`          | read payload width      |
//! | W_TX_PAYLOAD   | `0xA0`          | write payload width     |
//! | FLUSH_TX / RX  | `0xE1` / `0xE2` | —                       |
//!
//! ## Error policy
//!
//! Bus and pin failures are logged at `warn` and swallowed: the port
//! contract has no error channel for configuration calls, and a dead
//! link shows up as an echo timeout one layer up.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Operation, SpiDevice};
use log::{debug, warn};

use crate::app::ports::RadioPort;
use crate::config::{ADDRESS_WIDTH, Address, DataRate, PowerLevel, RadioSettings};
use crate::devices::MAX_PAYLOAD_SIZE;
use crate::error::RadioError;

// ── Commands ──────────────────────────────────────────────────

pub const R_REGISTER: u8 = 0x00;
pub const W_REGISTER: u8 = 0x20;
pub const R_RX_PAYLOAD: u8 = 0x61;
pub const W_TX_PAYLOAD: u8 = 0xA0;
pub const FLUSH_TX: u8 = 0xE1;
pub const FLUSH_RX: u8 = 0xE2;
const REGISTER_MASK: u8 = 0x1F;

// ── Registers ─────────────────────────────────────────────────

pub const CONFIG: u8 = 0x00;
pub const EN_AA: u8 = 0x01;
pub const EN_RXADDR: u8 = 0x02;
pub const SETUP_AW: u8 = 0x03;
pub const SETUP_RETR: u8 = 0x04;
pub const RF_CH: u8 = 0x05;
pub const RF_SETUP: u8 = 0x06;
pub const STATUS: u8 = 0x07;
pub const RX_ADDR_P0: u8 = 0x0A;
pub const TX_ADDR: u8 = 0x10;
pub const RX_PW_P0: u8 = 0x11;
pub const FIFO_STATUS: u8 = 0x17;
pub const DYNPD: u8 = 0x1C;
pub const FEATURE: u8 = 0x1D;

// ── Bits ──────────────────────────────────────────────────────

pub const EN_CRC: u8 = 1 << 3;
pub const CRCO: u8 = 1 << 2;
pub const PWR_UP: u8 = 1 << 1;
pub const PRIM_RX: u8 = 1 << 0;

pub const RX_DR: u8 = 1 << 6;
pub const TX_DS: u8 = 1 << 5;
pub const MAX_RT: u8 = 1 << 4;

pub const RX_EMPTY: u8 = 1 << 0;

const RF_DR_LOW: u8 = 1 << 5;
const RF_DR_HIGH: u8 = 1 << 3;
const LNA_HCURR: u8 = 1 << 0;

const ALL_PIPES: u8 = 0b0011_1111;
const PIPE_COUNT: u8 = 6;

/// Upper bound on waiting for TX_DS / MAX_RT after a write.
/// 15 retries at 4000 µs plus airtime at 250 kbps stays below this.
const TX_TIMEOUT_US: u32 = 95_000;
const TX_POLL_US: u32 = 100;

/// RF_SETUP value for a power/rate pair.
pub fn rf_setup_bits(power: PowerLevel, rate: DataRate) -> u8 {
    let pwr = match power {
        PowerLevel::Min => 0b00,
        PowerLevel::Low => 0b01,
        PowerLevel::High => 0b10,
        PowerLevel::Max => 0b11,
    } << 1;
    let dr = match rate {
        DataRate::Kbps250 => RF_DR_LOW,
        DataRate::Mbps1 => 0,
        DataRate::Mbps2 => RF_DR_HIGH,
    };
    pwr | dr | LNA_HCURR
}

fn bus<E: embedded_hal::spi::Error>(e: E) -> RadioError {
    RadioError::Bus(e.kind())
}

// ───────────────────────────────────────────────────────────────
// Driver
// ───────────────────────────────────────────────────────────────

pub struct Nrf24<SPI, CE, D> {
    spi: SPI,
    ce: CE,
    delay: D,
    payload_size: u8,
    /// Pipe 0 doubles as the ACK pipe while transmitting; its reading
    /// address is restored when listening resumes.
    pipe0_reading_address: Option<Address>,
}

impl<SPI, CE, D> Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, ce: CE, delay: D) -> Self {
        Self {
            spi,
            ce,
            delay,
            payload_size: MAX_PAYLOAD_SIZE as u8,
            pipe0_reading_address: None,
        }
    }

    /// Give the bus, pin and delay back.
    pub fn free(self) -> (SPI, CE, D) {
        (self.spi, self.ce, self.delay)
    }

    pub fn payload_size(&self) -> usize {
        self.payload_size as usize
    }

    // ── Register access ───────────────────────────────────────

    fn read_register(&mut self, reg: u8) -> Result<u8, RadioError> {
        let mut buf = [0u8];
        self.spi
            .transaction(&mut [
                Operation::Write(&[R_REGISTER | (reg & REGISTER_MASK)]),
                Operation::Read(&mut buf),
            ])
            .map_err(bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), RadioError> {
        self.write_register_bytes(reg, &[value])
    }

    fn write_register_bytes(&mut self, reg: u8, data: &[u8]) -> Result<(), RadioError> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[W_REGISTER | (reg & REGISTER_MASK)]),
                Operation::Write(data),
            ])
            .map_err(bus)
    }

    fn update_register(&mut self, reg: u8, set: u8, clear: u8) -> Result<(), RadioError> {
        let value = self.read_register(reg)?;
        self.write_register(reg, (value & !clear) | set)
    }

    fn command(&mut self, cmd: u8) -> Result<(), RadioError> {
        self.spi.write(&[cmd]).map_err(bus)
    }

    fn set_ce(&mut self, high: bool) -> Result<(), RadioError> {
        let res = if high {
            self.ce.set_high()
        } else {
            self.ce.set_low()
        };
        res.map_err(|_| RadioError::Pin)
    }

    // ── Fallible operations ───────────────────────────────────

    fn try_begin(&mut self) -> Result<bool, RadioError> {
        self.set_ce(false)?;
        // Power-on reset can take up to 100 ms; begin() is called after boot.
        self.delay.delay_ms(5);

        self.write_register(SETUP_RETR, (5 << 4) | 15)?;
        self.write_register(RF_SETUP, rf_setup_bits(PowerLevel::Max, DataRate::Mbps1))?;
        self.write_register(FEATURE, 0)?;
        self.write_register(DYNPD, 0)?;
        self.write_register(EN_AA, ALL_PIPES)?;
        self.write_register(EN_RXADDR, 0b11)?;
        self.write_register(SETUP_AW, 0b11)?; // 5-byte addresses
        self.write_register(RF_CH, 76)?;
        self.write_register(STATUS, RX_DR | TX_DS | MAX_RT)?;
        self.command(FLUSH_RX)?;
        self.command(FLUSH_TX)?;
        self.write_payload_widths()?;

        self.write_register(CONFIG, EN_CRC | CRCO)?;
        self.write_register(CONFIG, EN_CRC | CRCO | PWR_UP)?;
        self.delay.delay_ms(5); // Tpd2stby

        self.pipe0_reading_address = None;
        Ok(self.read_register(CONFIG)? == EN_CRC | CRCO | PWR_UP)
    }

    fn try_configure(&mut self, settings: &RadioSettings) -> Result<(), RadioError> {
        self.write_register(RF_CH, settings.channel)?;
        self.write_register(
            SETUP_RETR,
            ((settings.retry.delay & 0x0F) << 4) | (settings.retry.count & 0x0F),
        )?;
        self.write_register(RF_SETUP, rf_setup_bits(settings.power, settings.data_rate))
    }

    fn write_payload_widths(&mut self) -> Result<(), RadioError> {
        for pipe in 0..PIPE_COUNT {
            self.write_register(RX_PW_P0 + pipe, self.payload_size)?;
        }
        Ok(())
    }

    fn try_open_reading_pipe(&mut self, slot: u8, address: &Address) -> Result<(), RadioError> {
        if slot >= PIPE_COUNT {
            warn!("nrf24: reading pipe {} does not exist", slot);
            return Ok(());
        }
        if slot == 0 {
            self.pipe0_reading_address = Some(*address);
        }
        if slot < 2 {
            self.write_register_bytes(RX_ADDR_P0 + slot, address)?;
        } else {
            // Pipes 2–5 share pipe 1's upper bytes; only the LSB is programmable.
            self.write_register(RX_ADDR_P0 + slot, address[0])?;
        }
        self.write_register(RX_PW_P0 + slot, self.payload_size)?;
        self.update_register(EN_RXADDR, 1 << slot, 0)
    }

    fn try_open_writing_pipe(&mut self, address: &Address) -> Result<(), RadioError> {
        // Auto-ack replies come back on pipe 0 addressed like the target.
        self.write_register_bytes(RX_ADDR_P0, address)?;
        self.write_register_bytes(TX_ADDR, address)?;
        self.write_register(RX_PW_P0, self.payload_size)
    }

    fn try_start_listening(&mut self) -> Result<(), RadioError> {
        self.update_register(CONFIG, PRIM_RX, 0)?;
        self.write_register(STATUS, RX_DR | TX_DS | MAX_RT)?;
        self.set_ce(true)?;
        match self.pipe0_reading_address {
            Some(addr) => self.write_register_bytes(RX_ADDR_P0, &addr),
            None => self.update_register(EN_RXADDR, 0, 1),
        }
    }

    fn try_stop_listening(&mut self) -> Result<(), RadioError> {
        self.set_ce(false)?;
        self.delay.delay_us(100);
        self.update_register(CONFIG, 0, PRIM_RX)?;
        self.update_register(EN_RXADDR, 1, 0)
    }

    fn try_write(&mut self, payload: &[u8]) -> Result<bool, RadioError> {
        let width = self.payload_size as usize;
        let mut frame = [0u8; MAX_PAYLOAD_SIZE];
        let n = payload.len().min(width);
        frame[..n].copy_from_slice(&payload[..n]);

        self.spi
            .transaction(&mut [
                Operation::Write(&[W_TX_PAYLOAD]),
                Operation::Write(&frame[..width]),
            ])
            .map_err(bus)?;
        self.set_ce(true)?;

        let mut waited_us = 0;
        let status = loop {
            let status = self.read_register(STATUS)?;
            if status & (TX_DS | MAX_RT) != 0 {
                break status;
            }
            if waited_us >= TX_TIMEOUT_US {
                self.set_ce(false)?;
                self.command(FLUSH_TX)?;
                return Err(RadioError::TxStalled);
            }
            self.delay.delay_us(TX_POLL_US);
            waited_us += TX_POLL_US;
        };

        self.set_ce(false)?;
        self.write_register(STATUS, TX_DS | MAX_RT)?;
        if status & MAX_RT != 0 {
            debug!("nrf24: no ACK after retries");
            self.command(FLUSH_TX)?;
            return Ok(false);
        }
        Ok(true)
    }

    fn try_available(&mut self) -> Result<bool, RadioError> {
        Ok(self.read_register(FIFO_STATUS)? & RX_EMPTY == 0)
    }

    fn try_read(&mut self, buf: &mut [u8]) -> Result<(), RadioError> {
        let width = self.payload_size as usize;
        let mut frame = [0u8; MAX_PAYLOAD_SIZE];
        self.spi
            .transaction(&mut [
                Operation::Write(&[R_RX_PAYLOAD]),
                Operation::Read(&mut frame[..width]),
            ])
            .map_err(bus)?;
        let n = buf.len().min(width);
        buf[..n].copy_from_slice(&frame[..n]);
        self.write_register(STATUS, RX_DR)
    }
}

fn report<T>(op: &str, res: Result<T, RadioError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("nrf24: {} failed: {}", op, e);
            None
        }
    }
}

// ── RadioPort implementation ──────────────────────────────────

impl<SPI, CE, D> RadioPort for Nrf24<SPI, CE, D>
where
    SPI: SpiDevice,
    CE: OutputPin,
    D: DelayNs,
{
    fn begin(&mut self) -> bool {
        report("begin", self.try_begin()).unwrap_or(false)
    }

    fn set_auto_ack(&mut self, enabled: bool) {
        let value = if enabled { ALL_PIPES } else { 0 };
        report("set_auto_ack", self.write_register(EN_AA, value));
    }

    fn configure(&mut self, settings: &RadioSettings) {
        report("configure", self.try_configure(settings));
    }

    fn set_payload_size(&mut self, size: usize) {
        self.payload_size = size.clamp(1, MAX_PAYLOAD_SIZE) as u8;
        report("set_payload_size", self.write_payload_widths());
    }

    fn open_reading_pipe(&mut self, slot: u8, address: &Address) {
        report("open_reading_pipe", self.try_open_reading_pipe(slot, address));
    }

    fn open_writing_pipe(&mut self, address: &Address) {
        report("open_writing_pipe", self.try_open_writing_pipe(address));
    }

    fn start_listening(&mut self) {
        report("start_listening", self.try_start_listening());
    }

    fn stop_listening(&mut self) {
        report("stop_listening", self.try_stop_listening());
    }

    fn write(&mut self, payload: &[u8]) -> bool {
        report("write", self.try_write(payload)).unwrap_or(false)
    }

    fn available(&mut self) -> bool {
        report("available", self.try_available()).unwrap_or(false)
    }

    fn read(&mut self, buf: &mut [u8]) {
        report("read", self.try_read(buf));
    }
}

const _: () = assert!(ADDRESS_WIDTH == 5, "SETUP_AW is programmed for 5-byte addresses");
