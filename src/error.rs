//! Standard errors used by all functions in the crate.

use std::fmt;

/// Error collecting all possible failures of the MYBank client.
///
/// Signature verification never fails with an error: a signature that does not match
/// is reported as a `false` [`VerificationResult`](crate::signing::VerificationResult).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Key, certificate or passphrase could not be loaded.
    #[error("Invalid credentials: {0}")]
    CredentialError(String),
    /// The underlying cryptographic primitive failed.
    #[error("Error signing request: {0}")]
    SigningError(String),
    /// Contradictory or missing arguments, detected before any network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Reqwest error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Non-success HTTP response returned by a gateway.
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// The gateway answered, but reported a business failure.
    #[error("Gateway error {code}: {message}")]
    GatewayError { code: String, message: String },
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Gateway HTTP error.
#[derive(thiserror::Error, Debug)]
pub struct ApiError {
    /// HTTP status returned by the server.
    pub status: u16,
    /// Raw response body, or the canonical reason of the status if the body was empty.
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gateway HTTP error {}: {}", self.status, self.body)
    }
}
