use env_logger::Env;

/// Install the global logger.
///
/// `RUST_LOG` wins when set; otherwise both the binary and the audio library
/// log at `info` (`debug` with `verbose`) and everything else at `warn`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cadence=debug,cadence_audio=debug,warn"
    } else {
        "cadence=info,cadence_audio=info,warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}
