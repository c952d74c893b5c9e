//! Shared fixtures for unit tests.

use std::sync::OnceLock;

use permaweave_items::RsaPssSigner;

/// One 4096-bit key per test binary.
pub(crate) fn rsa_signer() -> &'static RsaPssSigner {
    static SIGNER: OnceLock<RsaPssSigner> = OnceLock::new();
    SIGNER.get_or_init(|| RsaPssSigner::generate().unwrap())
}

/// Route `tracing` output through the test harness.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
