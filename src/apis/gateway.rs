//! Response model shared by all the MYBank services.

use crate::{common::GATEWAY_SUCCESS, params::ParameterSet, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decoded reply of the MYBank gateway.
///
/// Only the outcome fields are typed, everything else returned by the service is kept
/// in [`fields`](GatewayResponse::fields) so that the response can be verified as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// `T` on success, `F` on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        self.is_success.as_deref() == Some(GATEWAY_SUCCESS)
    }

    /// Returns a service specific field as a string, if present.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Converts a business failure into an [`Error::GatewayError`].
    pub fn ensure_success(self) -> Result<Self, Error> {
        if self.is_success() {
            return Ok(self);
        }

        Err(Error::GatewayError {
            code: self
                .error_code
                .unwrap_or_else(|| self.is_success.unwrap_or_default()),
            message: self.error_message.unwrap_or_default(),
        })
    }

    /// The full response as a parameter set, ready for
    /// [`MyBankClient::verify_signature`](crate::MyBankClient::verify_signature).
    pub fn to_params(&self) -> Result<ParameterSet, Error> {
        ParameterSet::from_serializable(self)
    }
}
