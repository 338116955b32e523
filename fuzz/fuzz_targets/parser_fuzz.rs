#![no_main]
use libfuzzer_sys::fuzz_target;

const COMMANDS: [&str; 5] = ["group", "balance", "snapshot", "hexdump", "config"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let mut args = vec![COMMANDS[usize::from(selector) % COMMANDS.len()].to_string()];
    let text = String::from_utf8_lossy(rest);
    args.extend(text.split_whitespace().take(32).map(str::to_string));
    movedelta::cli::fuzz_try_parse_args(&args);
});
