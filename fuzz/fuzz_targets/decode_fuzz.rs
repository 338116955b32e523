#![no_main]
use libfuzzer_sys::fuzz_target;
use movedelta::report::GroupReport;
use movedelta::resource::{ValueFraming, decode_resource_group, decode_value};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode to a (possibly partial) group, never a panic.
    let decoded = decode_resource_group(data);
    for entry in &decoded.group.entries {
        let _ = entry.decode();
    }

    for framing in [ValueFraming::Auto, ValueFraming::WriteOp, ValueFraming::Bare] {
        let decoded = decode_value(data, framing);
        if let Some(e) = decoded.error {
            assert!(e.offset() <= data.len());
        }
        let _ = GroupReport::from(&decoded);
    }
});
