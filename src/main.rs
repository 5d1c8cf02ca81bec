fn main() {
    #[cfg(feature = "cli")]
    golombdelta::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("golombdelta: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
