// common test plumbing shared by the integration test crates


/// Install the test logger once; repeated calls are harmless.
#[allow(dead_code)]
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
