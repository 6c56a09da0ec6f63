#![no_main]

use anchortip_core::TooltipOptions;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must never panic, whatever the input.
    let from_json = TooltipOptions::from_json_str(text);
    let from_toml = TooltipOptions::from_toml_str(text);

    for layer in [from_json, from_toml].into_iter().flatten() {
        let mut config = anchortip_core::Configuration::default();
        config.apply(&layer);
        let _ = config.validate();
        let _ = config.effective_animation_duration();
        let _ = layer.merged_with(&TooltipOptions::new());
    }
});
