//! Module containing the main MYBank API client.

use crate::{
    apis::{instant_pay::InstantPayApi, trade::TradeApi, user::UserApi, MyBankClientInner},
    common::{
        DEFAULT_GATEWAY_URL, DEFAULT_INSTANT_PAY_URL, DEFAULT_SANDBOX_GATEWAY_URL,
        DEFAULT_SANDBOX_INSTANT_PAY_URL,
    },
    config::Config,
    executor::RequestExecutor,
    middlewares::error_handling::ErrorHandlingMiddleware,
    params::ParameterSet,
    signing::{
        LianPayEncryptor, PayloadEncryptor, RsaVerifier, SignatureContext, VerificationResult,
        Verifier,
    },
    Error,
};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use std::sync::Arc;

/// Client for the MYBank and LianLian instant-pay gateways.
#[derive(Debug, Clone)]
pub struct MyBankClient {
    /// Member APIs client.
    pub user: UserApi,
    /// Trade APIs client.
    pub trade: TradeApi,
    /// Instant-pay APIs client.
    pub instant_pay: InstantPayApi,
    inner: Arc<MyBankClientInner>,
}

impl MyBankClient {
    /// Builds a new [`MyBankClient`](crate::client::MyBankClient) with the default options.
    pub fn new(config: Config) -> Result<MyBankClient, Error> {
        MyBankClientBuilder::new(config).build()
    }

    /// Returns a new builder to configure a new [`MyBankClient`](crate::client::MyBankClient).
    pub fn builder(config: Config) -> MyBankClientBuilder {
        MyBankClientBuilder::new(config)
    }

    /// Verifies a response or asynchronous notification signed by MYBank.
    ///
    /// A mismatch, a missing signature or malformed key material all yield an unverified result.
    pub fn verify_signature(&self, params: &ParameterSet) -> VerificationResult {
        let tc = &self.inner.config.tc;
        RsaVerifier::new(&tc.public_key, tc.digest).verify(params)
    }

    /// The environment this client talks to.
    pub fn environment(&self) -> &Environment {
        &self.inner.environment
    }
}

/// Builder for a [`MyBankClient`](crate::client::MyBankClient).
#[derive(Debug)]
pub struct MyBankClientBuilder {
    config: Config,
    client: Option<reqwest::Client>,
    environment: Environment,
    tc_signature: Option<SignatureContext>,
    encryptor: Arc<dyn PayloadEncryptor>,
}

impl MyBankClientBuilder {
    /// Creates a new builder to configure a [`MyBankClient`](crate::client::MyBankClient).
    ///
    /// The environment follows the `production` flag of the configuration.
    pub fn new(config: Config) -> Self {
        let environment = if config.production {
            Environment::Production
        } else {
            Environment::Sandbox
        };

        Self {
            config,
            client: None,
            environment,
            tc_signature: None,
            encryptor: Arc::new(LianPayEncryptor),
        }
    }

    /// Consumes the builder and builds a new [`MyBankClient`](crate::client::MyBankClient).
    ///
    /// Fails if the signing material required by the configuration cannot be loaded.
    pub fn build(self) -> Result<MyBankClient, Error> {
        tracing::debug!(
            config = ?self.config,
            environment = ?self.environment,
            "Building MYBank client"
        );

        let tc_signature = match self.tc_signature {
            Some(tc_signature) => tc_signature,
            None => self.config.tc.signature_context()?,
        };
        let instant_pay_signature = self.config.instant_pay.signature_context();

        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.config.http.timeout()?)
                .build()?,
        };

        let inner = Arc::new(MyBankClientInner {
            executor: Arc::new(build_client_with_middleware(client)) as Arc<dyn RequestExecutor>,
            environment: self.environment,
            config: self.config,
            tc_signature,
            instant_pay_signature,
            encryptor: self.encryptor,
        });

        Ok(MyBankClient {
            user: UserApi::new(inner.clone()),
            trade: TradeApi::new(inner.clone()),
            instant_pay: InstantPayApi::new(inner.clone()),
            inner,
        })
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    ///
    /// The timeout of the configuration only applies to the default client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the environment to which this client should connect.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Signs MYBank requests with the given context instead of the one described by the configuration.
    pub fn with_tc_signature_context(mut self, tc_signature: SignatureContext) -> Self {
        self.tc_signature = Some(tc_signature);
        self
    }

    /// Replaces the `pay_load` encryption of instant-pay requests.
    pub fn with_payload_encryptor(mut self, encryptor: impl PayloadEncryptor + 'static) -> Self {
        self.encryptor = Arc::new(encryptor);
        self
    }
}

fn build_client_with_middleware(client: reqwest::Client) -> ClientWithMiddleware {
    reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .with(ErrorHandlingMiddleware)
        .build()
}

/// Gateways a [`MyBankClient`](crate::client::MyBankClient) connects to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Production,
    Sandbox,
    /// Custom URLs, e.g. a proxy or a mock server.
    Custom {
        gateway_url: Url,
        instant_pay_url: Url,
    },
}

impl Environment {
    /// Serves both gateways from a single host, with the MYBank gateway at `/gop/gateway.do`.
    ///
    /// Fails if `url` cannot be used as a base, e.g. `mailto:` or `data:` URLs.
    pub fn from_single_url(url: &Url) -> Result<Self, Error> {
        Ok(Self::Custom {
            gateway_url: join(url, "/gop/gateway.do")?,
            instant_pay_url: url.clone(),
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// URL of the MYBank gateway.
    pub fn gateway_url(&self) -> Url {
        match self {
            Environment::Production => Url::parse(DEFAULT_GATEWAY_URL).unwrap(),
            Environment::Sandbox => Url::parse(DEFAULT_SANDBOX_GATEWAY_URL).unwrap(),
            Environment::Custom { gateway_url, .. } => gateway_url.clone(),
        }
    }

    /// URL of an instant-pay operation.
    pub fn instant_pay_url(&self, path: &str) -> Result<Url, Error> {
        let base = match self {
            Environment::Production => Url::parse(DEFAULT_INSTANT_PAY_URL).unwrap(),
            Environment::Sandbox => Url::parse(DEFAULT_SANDBOX_INSTANT_PAY_URL).unwrap(),
            Environment::Custom {
                instant_pay_url, ..
            } => instant_pay_url.clone(),
        };

        join(&base, path)
    }
}

fn join(base: &Url, path: &str) -> Result<Url, Error> {
    base.join(path)
        .map_err(|e| Error::InvalidArgument(format!("Invalid gateway URL {}: {}", base, e)))
}
