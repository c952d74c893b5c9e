//! Shared fixtures for unit tests.

use std::sync::OnceLock;

use crate::signer::RsaPssSigner;

/// One 4096-bit key per test binary.
pub(crate) fn rsa_signer() -> &'static RsaPssSigner {
    static SIGNER: OnceLock<RsaPssSigner> = OnceLock::new();
    SIGNER.get_or_init(|| RsaPssSigner::generate().unwrap())
}
