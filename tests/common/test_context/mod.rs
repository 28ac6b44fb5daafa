#[cfg(not(feature = "acceptance-tests"))]
mod local_mock;

#[cfg(not(feature = "acceptance-tests"))]
pub use local_mock::{TestContext, INSTANT_PAY_NOTIFY_URL, OID_PARTNER, PARTNER_ID, TC_NOTIFY_URL};
#[cfg(feature = "acceptance-tests")]
pub use sandbox::TestContext;

/// Prints the client's debug events in the output of failing tests.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
