//! Fuzz target: `ControllerConfig::from_json`
//!
//! Invariants checked:
//! - No panics on arbitrary (including non-UTF-8) input
//! - Every config that loads also passes `validate()`
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use propctl::config::ControllerConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = ControllerConfig::from_json(text) {
        assert_eq!(cfg.validate(), Ok(()));
    }
});
