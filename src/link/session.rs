//! Link session manager.
//!
//! Brings the transceiver up once at startup and re-addresses it whenever
//! a different device class is about to be talked to.  Only one class is
//! active at a time; the controller is single-threaded so ownership of
//! the session is the only lock needed.

use log::{debug, info, warn};

use crate::app::ports::RadioPort;
use crate::config::ControllerConfig;
use crate::devices::DeviceClass;

/// Pipe the controller receives echoes on.
pub const LISTEN_PIPE: u8 = 1;

/// Tracks which device class the link is currently addressed to.
#[derive(Debug, Default)]
pub struct LinkSession {
    active: Option<DeviceClass>,
}

impl LinkSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot transceiver bring-up.
    ///
    /// The first `begin` with auto-ack off plus a listen/stop cycle drops the
    /// chip into standby; without it some modules ignore the second setup.
    /// Returns whether the chip answered the final `begin`.
    pub fn init(&mut self, radio: &mut impl RadioPort, config: &ControllerConfig) -> bool {
        radio.begin();
        radio.set_auto_ack(false);
        radio.start_listening();
        radio.stop_listening();

        let chip_ok = radio.begin();
        if !chip_ok {
            warn!("Radio did not answer begin(); exchanges will time out");
        }
        radio.set_auto_ack(true);
        radio.configure(&config.radio);
        radio.start_listening();

        self.active = None;
        info!(
            "Link up: channel={} power={:?} rate={:?} retries={}x{}",
            config.radio.channel,
            config.radio.power,
            config.radio.data_rate,
            config.radio.retry.count,
            config.radio.retry.delay,
        );
        chip_ok
    }

    /// Address the link to `class`.  A no-op if `class` is already active.
    ///
    /// Returns `true` if the pipes were actually reprogrammed.
    pub fn select(
        &mut self,
        radio: &mut impl RadioPort,
        config: &ControllerConfig,
        class: DeviceClass,
    ) -> bool {
        if self.active == Some(class) {
            return false;
        }

        radio.stop_listening();
        radio.set_payload_size(class.payload_size());
        radio.open_reading_pipe(LISTEN_PIPE, &config.listen_address);
        radio.open_writing_pipe(&config.address_for(class));
        radio.start_listening();

        self.active = Some(class);
        debug!(
            "Link addressed to {} ({} byte payload)",
            class.name(),
            class.payload_size()
        );
        true
    }

    /// Forget the active class and leave the radio listening.
    pub fn release(&mut self, radio: &mut impl RadioPort) -> Option<DeviceClass> {
        let prev = self.active.take()?;
        radio.start_listening();
        debug!("Link released from {}", prev.name());
        Some(prev)
    }

    pub fn active(&self) -> Option<DeviceClass> {
        self.active
    }
}
