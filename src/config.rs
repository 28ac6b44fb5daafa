//! Static configuration of the client.
//!
//! The configuration is usually read once at startup, either built in code or
//! loaded with [`Config::load`].

use crate::{
    signing::{DigestAlgorithm, Pkcs12Signer, SignatureContext, SigningStrategy},
    Error,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::{fmt, path::Path, time::Duration};

/// Root configuration for a [`MyBankClient`](crate::MyBankClient).
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// Selects the production endpoints instead of the sandbox ones.
    #[serde(default)]
    pub production: bool,
    #[serde(default)]
    pub http: HttpConfig,
    /// MYBank "tc" gateway (users and trades).
    pub tc: TcConfig,
    /// LianLian instant-pay gateway.
    pub instant_pay: InstantPayConfig,
}

impl Config {
    /// Loads the configuration from a file (any format supported by the `config` crate),
    /// with overrides from `MYBANK__*` environment variables.
    ///
    /// For example `MYBANK__TC__PARTNER_ID` overrides `tc.partner_id`.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, Error> {
        ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix("MYBANK").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Other(e.into()))
    }
}

/// Options passed through to the HTTP client.
#[derive(Deserialize, Clone, Debug)]
pub struct HttpConfig {
    /// Total request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

impl HttpConfig {
    /// Fails on a negative, infinite or NaN `timeout_secs`.
    pub fn timeout(&self) -> Result<Duration, Error> {
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|e| {
            Error::InvalidArgument(format!(
                "Invalid http.timeout_secs {}: {}",
                self.timeout_secs, e
            ))
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> f64 {
    5.0
}

/// Signature scheme used towards the MYBank gateway.
#[derive(Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TcSignType {
    /// PKCS#7 signature with a PKCS#12 certificate.
    #[default]
    Twsign,
    /// RSA signature with a private key.
    Rsa,
}

/// MYBank "tc" gateway configuration.
#[derive(Deserialize, Clone)]
pub struct TcConfig {
    pub partner_id: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub sign_type: TcSignType,
    /// PKCS#12 bundle, required by [`TcSignType::Twsign`].
    pub cert_path: Option<String>,
    pub cert_password: Option<SecretString>,
    /// RSA private key, required by [`TcSignType::Rsa`].
    pub private_key: Option<SecretString>,
    /// Digest of RSA signatures, both outgoing and incoming.
    #[serde(default = "default_tc_digest")]
    pub digest: DigestAlgorithm,
    /// MYBank public key, PEM or bare base64.
    pub public_key: String,
    /// Default asynchronous notification URL for trades.
    pub notify_url: Option<String>,
}

impl TcConfig {
    /// Builds the signing context for the configured scheme.
    pub fn signature_context(&self) -> Result<SignatureContext, Error> {
        match self.sign_type {
            TcSignType::Twsign => {
                let cert_path = self.cert_path.as_deref().ok_or_else(|| {
                    Error::CredentialError("tc.cert_path is required for TWSIGN".into())
                })?;
                let passphrase = self
                    .cert_password
                    .clone()
                    .unwrap_or_else(|| SecretString::new(String::new()));

                Ok(SignatureContext::new(Pkcs12Signer::from_file(
                    cert_path, passphrase,
                )?))
            }
            TcSignType::Rsa => Ok(SignatureContext::from_strategy(
                SigningStrategy::PrivateKey {
                    private_key: self.private_key.clone().ok_or_else(|| {
                        Error::CredentialError("tc.private_key is required for RSA".into())
                    })?,
                    digest: self.digest,
                },
            )),
        }
    }
}

impl fmt::Debug for TcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcConfig")
            .field("partner_id", &mask(&self.partner_id))
            .field("charset", &self.charset)
            .field("version", &self.version)
            .field("sign_type", &self.sign_type)
            .field("cert_path", &self.cert_path)
            .field("digest", &self.digest)
            .field("notify_url", &self.notify_url)
            .finish_non_exhaustive()
    }
}

fn default_charset() -> String {
    "utf-8".to_string()
}

fn default_version() -> String {
    "2.1".to_string()
}

fn default_tc_digest() -> DigestAlgorithm {
    DigestAlgorithm::Sha1
}

/// LianLian instant-pay configuration.
#[derive(Deserialize, Clone)]
pub struct InstantPayConfig {
    pub oid_partner: String,
    pub platform: String,
    /// Merchant RSA private key, PEM or bare base64.
    pub private_key: SecretString,
    /// LianLian public key, PEM or bare base64.
    pub ll_public_key: String,
    /// Default asynchronous notification URL for payments.
    pub notify_url: Option<String>,
}

impl InstantPayConfig {
    /// Instant pay always signs with RSA over an MD5 digest.
    pub fn signature_context(&self) -> SignatureContext {
        SignatureContext::from_strategy(SigningStrategy::PrivateKey {
            private_key: self.private_key.clone(),
            digest: DigestAlgorithm::Md5,
        })
    }
}

impl fmt::Debug for InstantPayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstantPayConfig")
            .field("oid_partner", &mask(&self.oid_partner))
            .field("platform", &self.platform)
            .field("notify_url", &self.notify_url)
            .finish_non_exhaustive()
    }
}

/// Masks an identifier for logging, keeping only its last 5 characters.
fn mask(value: &str) -> String {
    let tail: String = value
        .chars()
        .rev()
        .take(5)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{}", tail)
}
