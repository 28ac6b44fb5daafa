use crate::{
    params::ParameterSet,
    signing::{
        pem, truncate_for_log, DigestAlgorithm, SIGN_KEY, SIGN_TYPE_KEY, SIGN_TYPE_RSA,
        SIGN_TYPE_TWSIGN,
    },
    Error,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use openssl::{
    pkcs12::Pkcs12,
    pkcs7::{Pkcs7, Pkcs7Flags},
    pkey::PKey,
    rsa::Rsa,
    stack::Stack,
    x509::X509,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::{fmt, path::Path, sync::Arc};

/// A signature strategy over canonical strings.
///
/// Implementations must not mutate shared state while signing: a single signer
/// is used concurrently by all the requests of a client.
pub trait Signer: Send + Sync + fmt::Debug {
    /// Signs the canonical string and returns the base64 encoded signature.
    fn sign(&self, canonical: &str) -> Result<String, Error>;

    /// Value attached to signed requests as `sign_type`.
    fn sign_type(&self) -> &str;
}

/// Signs with the certificate and private key stored in a PKCS#12 bundle.
///
/// Produces a PKCS#7 detached signature without signed attributes. The bundle is decrypted
/// on every call, so the private key is never kept in memory between requests.
pub struct Pkcs12Signer {
    bundle: Vec<u8>,
    passphrase: SecretString,
}

impl Pkcs12Signer {
    pub fn new(bundle: Vec<u8>, passphrase: SecretString) -> Self {
        Self { bundle, passphrase }
    }

    /// Reads the DER encoded PKCS#12 bundle from disk.
    pub fn from_file(path: impl AsRef<Path>, passphrase: SecretString) -> Result<Self, Error> {
        let path = path.as_ref();
        let bundle = std::fs::read(path).map_err(|e| {
            Error::CredentialError(format!(
                "Cannot read certificate bundle {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::new(bundle, passphrase))
    }
}

impl fmt::Debug for Pkcs12Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pkcs12Signer")
            .field("bundle_len", &self.bundle.len())
            .finish_non_exhaustive()
    }
}

impl Signer for Pkcs12Signer {
    fn sign(&self, canonical: &str) -> Result<String, Error> {
        let parsed = Pkcs12::from_der(&self.bundle)
            .and_then(|bundle| bundle.parse2(self.passphrase.expose_secret()))
            .map_err(|e| Error::CredentialError(format!("Cannot read PKCS#12 bundle: {}", e)))?;

        let (pkey, cert) = match (parsed.pkey, parsed.cert) {
            (Some(pkey), Some(cert)) => (pkey, cert),
            _ => {
                return Err(Error::CredentialError(
                    "PKCS#12 bundle must contain both a private key and a certificate".into(),
                ))
            }
        };

        let extra_certs = Stack::<X509>::new().map_err(signing_error)?;
        let flags = Pkcs7Flags::DETACHED | Pkcs7Flags::NOATTR | Pkcs7Flags::BINARY;
        let signature = Pkcs7::sign(&cert, &pkey, &extra_certs, canonical.as_bytes(), flags)
            .and_then(|pkcs7| pkcs7.to_der())
            .map_err(signing_error)?;

        Ok(STANDARD.encode(signature))
    }

    fn sign_type(&self) -> &str {
        SIGN_TYPE_TWSIGN
    }
}

/// Signs with an RSA private key (PKCS#1 v1.5 padding).
///
/// The key must be in the traditional `RSA PRIVATE KEY` format. A bare base64 body
/// without PEM armor is accepted as well.
pub struct RsaSigner {
    private_key: SecretString,
    digest: DigestAlgorithm,
}

impl RsaSigner {
    pub fn new(private_key: SecretString, digest: DigestAlgorithm) -> Self {
        Self {
            private_key,
            digest,
        }
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

impl Signer for RsaSigner {
    fn sign(&self, canonical: &str) -> Result<String, Error> {
        let pem = pem::rsa_private_key(self.private_key.expose_secret());
        let pkey = Rsa::private_key_from_pem(pem.as_bytes())
            .and_then(PKey::from_rsa)
            .map_err(|e| Error::CredentialError(format!("Invalid RSA private key: {}", e)))?;

        let mut signer = openssl::sign::Signer::new(self.digest.message_digest(), &pkey)
            .map_err(signing_error)?;
        signer
            .update(canonical.as_bytes())
            .map_err(signing_error)?;
        let signature = signer.sign_to_vec().map_err(signing_error)?;

        Ok(STANDARD.encode(signature))
    }

    fn sign_type(&self) -> &str {
        SIGN_TYPE_RSA
    }
}

fn signing_error(e: openssl::error::ErrorStack) -> Error {
    Error::SigningError(e.to_string())
}

/// Signing strategy and credential material, as read from configuration.
pub enum SigningStrategy {
    /// PKCS#7 signature with the key and certificate of a PKCS#12 bundle.
    Certificate {
        bundle: Vec<u8>,
        passphrase: SecretString,
    },
    /// RSA signature with a private key.
    PrivateKey {
        private_key: SecretString,
        digest: DigestAlgorithm,
    },
}

impl fmt::Debug for SigningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningStrategy::Certificate { .. } => f.write_str("Certificate"),
            SigningStrategy::PrivateKey { digest, .. } => {
                write!(f, "PrivateKey({})", digest)
            }
        }
    }
}

/// Immutable signing context shared by all the endpoints of a gateway.
#[derive(Clone, Debug)]
pub struct SignatureContext {
    signer: Arc<dyn Signer>,
}

impl SignatureContext {
    pub fn new(signer: impl Signer + 'static) -> Self {
        Self {
            signer: Arc::new(signer),
        }
    }

    pub fn from_strategy(strategy: SigningStrategy) -> Self {
        match strategy {
            SigningStrategy::Certificate { bundle, passphrase } => {
                Self::new(Pkcs12Signer::new(bundle, passphrase))
            }
            SigningStrategy::PrivateKey {
                private_key,
                digest,
            } => Self::new(RsaSigner::new(private_key, digest)),
        }
    }

    pub fn sign_type(&self) -> &str {
        self.signer.sign_type()
    }

    /// Signs a parameter set.
    ///
    /// `null` values are dropped and any previous `sign` is discarded. If the set already
    /// carries a `sign_type`, it is part of the signed content; otherwise the strategy's
    /// `sign_type` is attached after signing.
    #[tracing::instrument(name = "Sign Request", level = "debug", skip_all)]
    pub fn sign_request(&self, params: ParameterSet) -> Result<SignedRequest, Error> {
        let mut params = params.filter_nulls();
        params.remove(SIGN_KEY);

        let canonical = params.canonical_string();
        let signature = match self.signer.sign(&canonical) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::debug!(
                    params = ?params,
                    canonical = %canonical,
                    error = %e,
                    "Failed to sign request parameters"
                );
                return Err(e);
            }
        };

        tracing::debug!(
            params = ?params,
            canonical = %canonical,
            signature = %truncate_for_log(&signature),
            "Signed request parameters"
        );

        params.insert(SIGN_KEY, signature);
        if !params.contains_key(SIGN_TYPE_KEY) {
            params.insert(SIGN_TYPE_KEY, self.signer.sign_type());
        }

        Ok(SignedRequest { params })
    }
}

/// A parameter set carrying its own `sign` and `sign_type`.
///
/// Only read access is exposed: mutating the set would invalidate the signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignedRequest {
    params: ParameterSet,
}

impl SignedRequest {
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn signature(&self) -> &str {
        self.params.get_str(SIGN_KEY).unwrap_or_default()
    }

    pub fn sign_type(&self) -> &str {
        self.params.get_str(SIGN_TYPE_KEY).unwrap_or_default()
    }

    pub fn into_params(self) -> ParameterSet {
        self.params
    }
}
