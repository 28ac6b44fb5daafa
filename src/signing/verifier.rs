use crate::{
    params::ParameterSet,
    signing::{pem, DigestAlgorithm, SIGN_KEY, SIGN_TYPE_KEY, SIGN_TYPE_RSA},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use openssl::pkey::PKey;
use std::fmt;

/// Trust decision over an inbound parameter set.
pub trait Verifier: Send + Sync + fmt::Debug {
    /// Checks the `sign` field of `params` against the rest of the set.
    fn verify(&self, params: &ParameterSet) -> VerificationResult;
}

/// Outcome of a signature verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// `true` only if the signature matched.
    pub verified: bool,
    /// The parameter set the signature was checked against.
    pub params: ParameterSet,
}

/// Verifies RSA signatures with the counterparty's public key.
#[derive(Clone)]
pub struct RsaVerifier {
    public_key: String,
    digest: DigestAlgorithm,
    include_sign_type: bool,
}

impl RsaVerifier {
    /// `public_key` may be a PEM block or a bare base64 body.
    pub fn new(public_key: &str, digest: DigestAlgorithm) -> Self {
        Self {
            public_key: pem::public_key(public_key),
            digest,
            include_sign_type: false,
        }
    }

    /// Keeps `sign_type` in the verified content, for counterparties which sign it.
    pub fn including_sign_type(mut self) -> Self {
        self.include_sign_type = true;
        self
    }
}

impl fmt::Debug for RsaVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaVerifier")
            .field("digest", &self.digest)
            .field("include_sign_type", &self.include_sign_type)
            .finish_non_exhaustive()
    }
}

impl Verifier for RsaVerifier {
    fn verify(&self, params: &ParameterSet) -> VerificationResult {
        let mut checked = params.filter_nulls();

        let signature = checked
            .remove(SIGN_KEY)
            .and_then(|v| v.as_str().map(str::to_owned));
        let sign_type = checked.get_str(SIGN_TYPE_KEY).map(str::to_owned);
        if !self.include_sign_type {
            checked.remove(SIGN_TYPE_KEY);
        }

        let verified = match (signature, sign_type) {
            (Some(signature), Some(sign_type)) if sign_type == SIGN_TYPE_RSA => {
                check(
                    &checked.canonical_string(),
                    &signature,
                    self.digest,
                    &self.public_key,
                )
            }
            (Some(_), Some(sign_type)) => {
                tracing::debug!(%sign_type, "Unsupported signature type");
                false
            }
            _ => {
                tracing::debug!("Missing sign or sign_type");
                false
            }
        };

        tracing::debug!(verified, params = ?checked, "Verify signature result");

        VerificationResult {
            verified,
            params: checked,
        }
    }
}

/// Checks `signature` (base64) over the canonical string of `params`.
///
/// `params` must carry `sign_type=RSA`. `sign` and `sign_type` are removed from the set
/// before canonicalisation. Any malformed input is reported as `false`.
pub fn verify(
    params: &ParameterSet,
    signature: &str,
    digest: DigestAlgorithm,
    public_key: &str,
) -> bool {
    if signature.is_empty() {
        tracing::debug!("Missing sign");
        return false;
    }
    match params.get_str(SIGN_TYPE_KEY) {
        Some(SIGN_TYPE_RSA) => {}
        Some(sign_type) => {
            tracing::debug!(%sign_type, "Unsupported signature type");
            return false;
        }
        None => {
            tracing::debug!("Missing sign_type");
            return false;
        }
    }

    let mut params = params.filter_nulls();
    params.remove(SIGN_KEY);
    params.remove(SIGN_TYPE_KEY);

    check(
        &params.canonical_string(),
        signature,
        digest,
        &pem::public_key(public_key),
    )
}

fn check(canonical: &str, signature: &str, digest: DigestAlgorithm, public_key_pem: &str) -> bool {
    let result = (|| -> Result<bool, anyhow::Error> {
        let signature: String = signature.chars().filter(|c| !c.is_whitespace()).collect();
        let signature = STANDARD.decode(signature)?;
        let pkey = PKey::public_key_from_pem(public_key_pem.as_bytes())?;

        let mut verifier = openssl::sign::Verifier::new(digest.message_digest(), &pkey)?;
        verifier.update(canonical.as_bytes())?;
        Ok(verifier.verify(&signature)?)
    })();

    result.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Signature verification failed");
        false
    })
}
