fn main() {
    #[cfg(feature = "cli")]
    movedelta::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("movedelta: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
