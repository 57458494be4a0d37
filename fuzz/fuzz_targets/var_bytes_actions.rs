#![no_main]
use columnar_fuzz::{test_var_actions, VarAction};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<Vec<u8>>, Vec<VarAction>)| {
    test_var_actions(data.0, data.1);
});
