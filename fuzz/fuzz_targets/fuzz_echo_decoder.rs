//! Fuzz target: `DeviceConfig::decode` (echo path)
//!
//! The first byte picks the device class, the rest is treated as an echo
//! payload off the air.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Only payloads of exactly the class width decode
//! - Anything that decodes re-encodes to the same bytes
//!
//! cargo fuzz run fuzz_echo_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use propctl::devices::{DeviceClass, DeviceConfig};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let class = DeviceClass::ALL[usize::from(selector) % DeviceClass::COUNT];

    match DeviceConfig::decode(class, payload) {
        Ok(cfg) => {
            assert_eq!(payload.len(), class.payload_size());
            assert_eq!(cfg.class(), class);
            assert_eq!(cfg.encode().as_slice(), payload);
        }
        Err(_) => {}
    }
});
