use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `env_logger` once per test binary so `RUST_LOG=trace cargo
/// test -- --nocapture` shows the solver's trace/debug output.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
