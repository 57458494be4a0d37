#![no_main]
use columnar_fuzz::{test_fixed_actions, FixedAction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u8, u8, Vec<FixedAction>)| {
    test_fixed_actions(data.0, data.1, data.2);
});
