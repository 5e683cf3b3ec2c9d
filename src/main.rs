fn main() {
    #[cfg(feature = "cli")]
    bitspeak::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("bitspeak: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
