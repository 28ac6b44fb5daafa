use crate::{
    apis::{
        instant_pay::{InstantPayResponse, PaymentRequest},
        MyBankClientInner,
    },
    common::{INSTANT_PAY_CONFIRM_PATH, INSTANT_PAY_PAYMENT_PATH, INSTANT_PAY_QUERY_PATH},
    params::ParameterSet,
    signing::{DigestAlgorithm, RsaVerifier, VerificationResult, Verifier, SIGN_TYPE_RSA},
    Error,
};
use chrono::Local;
use rand::Rng;
use std::sync::Arc;

static ORDER_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generates a merchant order number.
///
/// Local time down to the second, 6 microsecond digits and a random 4 digit suffix.
/// Numbers are not guaranteed to be unique.
pub fn generate_order_number() -> String {
    let now = Local::now();
    format!(
        "{}{:06}{}",
        now.format(ORDER_TIME_FORMAT),
        now.timestamp_subsec_micros() % 1_000_000,
        rand::thread_rng().gen_range(1000..=9999)
    )
}

/// LianLian instant-pay APIs client.
#[derive(Clone, Debug)]
pub struct InstantPayApi {
    inner: Arc<MyBankClientInner>,
}

impl InstantPayApi {
    pub(crate) fn new(inner: Arc<MyBankClientInner>) -> Self {
        Self { inner }
    }

    /// Requests a payment to a bank card.
    #[tracing::instrument(
        name = "Instant Payment",
        skip(self, request),
        fields(money_order_in_minor = request.money_order_in_minor)
    )]
    pub async fn payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<Option<InstantPayResponse>, Error> {
        let api_version = if self.inner.environment.is_production() {
            "1.1"
        } else {
            "1.0"
        };
        let no_order = request
            .no_order
            .clone()
            .unwrap_or_else(generate_order_number);
        let dt_order = Local::now().format(ORDER_TIME_FORMAT).to_string();

        tracing::debug!(%no_order, "Requesting payment");

        let params = request.to_params(
            api_version,
            dt_order,
            no_order,
            self.inner.config.instant_pay.notify_url.as_deref(),
        );
        self.inner
            .call_instant_pay(INSTANT_PAY_PAYMENT_PATH, params, true)
            .await
    }

    /// Confirms a payment suspected to be a duplicate.
    #[tracing::instrument(name = "Confirm Instant Payment", skip(self, confirm_code))]
    pub async fn confirm_payment(
        &self,
        no_order: &str,
        confirm_code: &str,
        notify_url: Option<&str>,
    ) -> Result<Option<InstantPayResponse>, Error> {
        let mut params = ParameterSet::new();
        params
            .insert("api_version", "1.0")
            .insert("sign_type", SIGN_TYPE_RSA)
            .insert("no_order", no_order)
            .insert("confirm_code", confirm_code)
            .insert_opt(
                "notify_url",
                notify_url.or(self.inner.config.instant_pay.notify_url.as_deref()),
            );

        self.inner
            .call_instant_pay(INSTANT_PAY_CONFIRM_PATH, params, true)
            .await
    }

    /// Gets the status of a payment by merchant order number or LianLian payment id.
    ///
    /// At least one of the two must be present.
    #[tracing::instrument(name = "Query Instant Payment", skip(self))]
    pub async fn query_payment(
        &self,
        no_order: Option<&str>,
        oid_paybill: Option<&str>,
    ) -> Result<Option<InstantPayResponse>, Error> {
        let no_order = no_order.filter(|s| !s.is_empty());
        let oid_paybill = oid_paybill.filter(|s| !s.is_empty());
        if no_order.is_none() && oid_paybill.is_none() {
            return Err(Error::InvalidArgument(
                "no_order and oid_paybill cannot both be empty".into(),
            ));
        }

        let mut params = ParameterSet::new();
        params
            .insert("api_version", "1.0")
            .insert("sign_type", SIGN_TYPE_RSA)
            .insert_opt("no_order", no_order)
            .insert_opt("oid_paybill", oid_paybill);

        self.inner
            .call_instant_pay(INSTANT_PAY_QUERY_PATH, params, false)
            .await
    }

    /// Verifies a response or notification signed by LianLian.
    ///
    /// `sign_type` is part of the signed content.
    pub fn verify_signature(&self, params: &ParameterSet) -> VerificationResult {
        RsaVerifier::new(
            &self.inner.config.instant_pay.ll_public_key,
            DigestAlgorithm::Md5,
        )
        .including_sign_type()
        .verify(params)
    }
}
