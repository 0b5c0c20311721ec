/// Intercept messages using the `log` crate and print them to STDERR. Defaults to `info`; set
/// `RUST_LOG` to change the filter.
pub fn setup() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Like `setup`, but safe to call more than once. Meant for tests.
pub fn setup_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
