#![no_main]
use libfuzzer_sys::fuzz_target;
use movedelta::resource::coin_store_balance;

fuzz_target!(|data: &[u8]| {
    let _ = coin_store_balance(data);
});
