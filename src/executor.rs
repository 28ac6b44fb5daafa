//! HTTP capability used by the endpoint builders.

use crate::{params::ParameterSet, Error};
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{Map, Value};

/// A decoded JSON object returned by a gateway.
pub type Document = Map<String, Value>;

/// Sends signed parameter sets to a gateway.
///
/// Both methods return `None` when the gateway answers with an empty body.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// POSTs `params` as an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: Url, params: &ParameterSet) -> Result<Option<Document>, Error>;

    /// POSTs `params` as a JSON object.
    async fn post_json(&self, url: Url, params: &ParameterSet) -> Result<Option<Document>, Error>;
}

#[async_trait]
impl RequestExecutor for ClientWithMiddleware {
    async fn post_form(&self, url: Url, params: &ParameterSet) -> Result<Option<Document>, Error> {
        let body = self
            .post(url)
            .form(&params.to_form_pairs())
            .send()
            .await?
            .text()
            .await?;

        parse_body(&body)
    }

    async fn post_json(&self, url: Url, params: &ParameterSet) -> Result<Option<Document>, Error> {
        let body = self
            .post(url)
            .json(&params.filter_nulls())
            .send()
            .await?
            .text()
            .await?;

        parse_body(&body)
    }
}

fn parse_body(body: &str) -> Result<Option<Document>, Error> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(body).map_err(|e| Error::Other(e.into()))? {
        Value::Object(document) => Ok(Some(document)),
        Value::Null => Ok(None),
        other => Err(Error::Other(anyhow!("Unexpected response body: {}", other))),
    }
}
