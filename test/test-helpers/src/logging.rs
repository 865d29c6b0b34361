/// Initialise `env_logger` for a test, honouring `RUST_LOG`.
///
/// Safe to call from every test, only the first call has an effect.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
