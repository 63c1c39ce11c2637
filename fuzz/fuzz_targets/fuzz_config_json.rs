//! Fuzz target: `JsonConfigFile::parse`
//!
//! Arbitrary documents must either be rejected or yield a configuration
//! that passes validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use envmon::adapters::config_file::JsonConfigFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = JsonConfigFile::parse(text) {
        assert!(config.validate().is_ok());
    }
});
