use crate::error::{ApiError, Error};
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Reqwest middleware which translates non-success HTTP responses returned by the gateways
/// into [`Error::ApiError`](crate::error::Error)s.
///
/// Business failures (`is_success=F`, `ret_code` other than `0000`) are delivered with a
/// `200 OK` and are not handled here.
#[derive(Debug)]
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let response = next.run(req, extensions).await?;

        // Neither gateway has a structured error body, so keep the raw text.
        // An empty body is replaced by the canonical reason of the status code.
        if !response.status().is_success() {
            let status = response.status();
            let bytes = response.bytes().await?;

            tracing::debug!("Failed HTTP request. Status code: {}", status);

            let body = if bytes.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown Error")
                    .to_string()
            } else {
                String::from_utf8_lossy(&bytes).into_owned()
            };

            return Err(Error::ApiError(ApiError {
                status: status.as_u16(),
                body,
            })
            .into());
        }

        Ok(response)
    }
}
