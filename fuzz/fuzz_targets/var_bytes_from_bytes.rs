#![no_main]
use columnar_fuzz::test_var_from_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bytes: &[u8]| {
    test_var_from_bytes(bytes);
});
