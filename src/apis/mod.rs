//! Clients for the MYBank and LianLian instant-pay APIs.

use crate::{
    apis::{gateway::GatewayResponse, instant_pay::InstantPayResponse},
    client::Environment,
    config::Config,
    executor::{Document, RequestExecutor},
    params::ParameterSet,
    signing::{build_pay_load, PayloadEncryptor, SignatureContext},
    Error,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

pub mod gateway;
pub mod instant_pay;
pub mod trade;
pub mod user;

pub(crate) struct MyBankClientInner {
    pub(crate) executor: Arc<dyn RequestExecutor>,
    pub(crate) environment: Environment,
    pub(crate) config: Config,
    pub(crate) tc_signature: SignatureContext,
    pub(crate) instant_pay_signature: SignatureContext,
    pub(crate) encryptor: Arc<dyn PayloadEncryptor>,
}

impl MyBankClientInner {
    /// Completes, signs and sends a request to the MYBank gateway.
    pub(crate) async fn call_gateway(
        &self,
        service: &str,
        mut params: ParameterSet,
    ) -> Result<Option<GatewayResponse>, Error> {
        params
            .insert("service", service)
            .insert("charset", self.config.tc.charset.as_str())
            .insert("partner_id", self.config.tc.partner_id.as_str())
            .insert("version", self.config.tc.version.as_str());

        let signed = self.tc_signature.sign_request(params)?;
        let document = self
            .executor
            .post_form(self.environment.gateway_url(), signed.params())
            .await?;

        from_document(document)
    }

    /// Completes, signs and sends a request to the instant-pay gateway.
    ///
    /// When `envelope` is set the signed request is encrypted into a `pay_load`.
    pub(crate) async fn call_instant_pay(
        &self,
        path: &str,
        mut params: ParameterSet,
        envelope: bool,
    ) -> Result<Option<InstantPayResponse>, Error> {
        let config = &self.config.instant_pay;
        params
            .insert("oid_partner", config.oid_partner.as_str())
            .insert("platform", config.platform.as_str());

        let signed = self.instant_pay_signature.sign_request(params)?;
        let body = if envelope {
            build_pay_load(
                &signed,
                &config.oid_partner,
                &config.ll_public_key,
                self.encryptor.as_ref(),
            )?
        } else {
            signed.into_params()
        };

        let document = self
            .executor
            .post_json(self.environment.instant_pay_url(path)?, &body)
            .await?;

        from_document(document)
    }
}

fn from_document<T: DeserializeOwned>(document: Option<Document>) -> Result<Option<T>, Error> {
    document
        .map(|document| serde_json::from_value(Value::Object(document)))
        .transpose()
        .map_err(|e| Error::Other(e.into()))
}

impl Debug for MyBankClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyBankClientInner")
            .field("environment", &self.environment)
            .field("config", &self.config)
            .field("tc_signature", &self.tc_signature)
            .finish_non_exhaustive()
    }
}
