//! env_logger setup. `RUST_LOG` overrides the default `info` filter.

use env_logger::{Builder, Env};

pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}
