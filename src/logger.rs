use env_logger::Env;

/// Environment variable holding an `env_logger` filter, e.g. `debug` or `stenciler=trace`.
pub const LOG_LEVEL_ENV: &str = "STENCILER_LOG_LEVEL";

pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().filter_or(LOG_LEVEL_ENV, default_level))
        .init();
}
