//! Request signing, response verification and payload envelopes.
//!
//! Outgoing parameter sets are signed over their [canonical string](crate::params::encode)
//! and carry the signature in the `sign` field, together with the scheme name in `sign_type`.
//! Inbound responses and callbacks are checked with the counterparty's public key.

mod envelope;
mod pem;
mod signer;
mod verifier;

pub use envelope::{build_pay_load, LianPayEncryptor, PayloadEncryptor};
pub use signer::{
    Pkcs12Signer, RsaSigner, SignatureContext, SignedRequest, Signer, SigningStrategy,
};
pub use verifier::{verify, RsaVerifier, VerificationResult, Verifier};

use openssl::hash::MessageDigest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the field carrying the signature.
pub const SIGN_KEY: &str = "sign";
/// Name of the field carrying the signature scheme.
pub const SIGN_TYPE_KEY: &str = "sign_type";

/// Certificate-based PKCS#7 signature scheme.
pub const SIGN_TYPE_TWSIGN: &str = "TWSIGN";
/// RSA private-key signature scheme.
pub const SIGN_TYPE_RSA: &str = "RSA";

/// Digest algorithm used by RSA signatures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    pub(crate) fn message_digest(self) -> MessageDigest {
        match self {
            DigestAlgorithm::Md5 => MessageDigest::md5(),
            DigestAlgorithm::Sha1 => MessageDigest::sha1(),
            DigestAlgorithm::Sha256 => MessageDigest::sha256(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha256 => "SHA256",
        })
    }
}

/// Shortens a signature for log output.
pub(crate) fn truncate_for_log(value: &str) -> String {
    const MAX_LEN: usize = 16;

    match value.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}
