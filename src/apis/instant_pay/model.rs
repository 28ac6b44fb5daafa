use crate::{
    common::INSTANT_PAY_SUCCESS,
    params::{format_amount, ParameterSet},
    pollable::IsInTerminalState,
    signing::SIGN_TYPE_RSA,
    Error, MyBankClient, Pollable,
};
use anyhow::anyhow;
use async_trait::async_trait;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Whether the receiving account belongs to a person or an organisation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub enum FlagCard {
    #[default]
    #[serde(rename = "0")]
    Personal,
    #[serde(rename = "1")]
    Organisation,
}

impl FlagCard {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCard::Personal => "0",
            FlagCard::Organisation => "1",
        }
    }
}

/// A payment to a bank card.
///
/// For organisation accounts the gateway recommends sending either `prcptcd` and
/// `bank_code`, or `brabank_name`, `city_code` and `bank_code`.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub struct PaymentRequest {
    pub money_order_in_minor: u64,
    /// Receiving bank account number.
    #[builder(setter(into))]
    pub card_no: String,
    #[builder(setter(into))]
    pub acct_name: String,
    /// Purpose of the payment.
    #[builder(setter(into))]
    pub info_order: String,
    /// Remark forwarded to the bank.
    #[builder(setter(into))]
    pub memo: String,
    /// Merchant order number. Generated when absent.
    #[builder(setter(into, strip_option), default)]
    pub no_order: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub risk_item: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub notify_url: Option<String>,
    #[builder(default)]
    pub flag_card: FlagCard,
    #[builder(setter(into, strip_option), default)]
    pub bank_name: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub prcptcd: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub bank_code: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub city_code: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub brabank_name: Option<String>,
}

impl PaymentRequest {
    pub(crate) fn to_params(
        &self,
        api_version: &str,
        dt_order: String,
        no_order: String,
        default_notify_url: Option<&str>,
    ) -> ParameterSet {
        let mut params = ParameterSet::new();
        params
            .insert("api_version", api_version)
            .insert("sign_type", SIGN_TYPE_RSA)
            .insert("no_order", no_order)
            .insert("dt_order", dt_order)
            .insert("money_order", format_amount(self.money_order_in_minor))
            .insert("card_no", self.card_no.as_str())
            .insert("acct_name", self.acct_name.as_str())
            .insert("info_order", self.info_order.as_str())
            .insert("flag_card", self.flag_card.as_str())
            .insert("memo", self.memo.as_str())
            .insert_opt(
                "notify_url",
                self.notify_url.as_deref().or(default_notify_url),
            )
            .insert_opt("risk_item", self.risk_item.as_deref())
            .insert_opt("bank_name", self.bank_name.as_deref())
            .insert_opt("prcptcd", self.prcptcd.as_deref())
            .insert_opt("bank_code", self.bank_code.as_deref())
            .insert_opt("city_code", self.city_code.as_deref())
            .insert_opt("brabank_name", self.brabank_name.as_deref());
        params
    }
}

/// Status of an instant payment, as reported in `result_pay`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub enum PaymentResult {
    Apply,
    Check,
    Processing,
    Success,
    Failure,
    Cancel,
    Closed,
}

impl PaymentResult {
    pub fn from_code(code: &str) -> Option<PaymentResult> {
        match code {
            "APPLY" => Some(PaymentResult::Apply),
            "CHECK" => Some(PaymentResult::Check),
            "PROCESSING" => Some(PaymentResult::Processing),
            "SUCCESS" => Some(PaymentResult::Success),
            "FAILURE" => Some(PaymentResult::Failure),
            "CANCEL" => Some(PaymentResult::Cancel),
            "CLOSED" => Some(PaymentResult::Closed),
            _ => None,
        }
    }
}

/// Decoded reply of the instant-pay gateway.
///
/// Fields are kept as the strings the gateway returned so that the response can be
/// converted back with [`to_params`](InstantPayResponse::to_params) and verified.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstantPayResponse {
    pub ret_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret_msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_order: Option<String>,
    /// Payment id assigned by LianLian.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid_paybill: Option<String>,
    /// Returned with code `4002` when the payment looks like a duplicate and must be confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_pay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_type: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl InstantPayResponse {
    pub fn is_success(&self) -> bool {
        self.ret_code == INSTANT_PAY_SUCCESS
    }

    /// Parsed `result_pay`, `None` if absent or unknown.
    pub fn payment_result(&self) -> Option<PaymentResult> {
        self.result_pay.as_deref().and_then(PaymentResult::from_code)
    }

    /// Converts a business failure into an [`Error::GatewayError`].
    pub fn ensure_success(self) -> Result<Self, Error> {
        if self.is_success() {
            return Ok(self);
        }

        Err(Error::GatewayError {
            code: self.ret_code,
            message: self.ret_msg.unwrap_or_default(),
        })
    }

    /// The full response as a parameter set, ready for
    /// [`InstantPayApi::verify_signature`](crate::apis::instant_pay::InstantPayApi::verify_signature).
    pub fn to_params(&self) -> Result<ParameterSet, Error> {
        ParameterSet::from_serializable(self)
    }
}

#[async_trait]
impl Pollable for InstantPayResponse {
    type Output = InstantPayResponse;

    async fn poll_once(&self, client: &MyBankClient) -> Result<Self::Output, Error> {
        client
            .instant_pay
            .query_payment(self.no_order.as_deref(), self.oid_paybill.as_deref())
            .await?
            .ok_or_else(|| Error::Other(anyhow!("Empty response while polling payment")))
    }
}

impl IsInTerminalState for InstantPayResponse {
    /// A payment is considered to be in a terminal state if it is `SUCCESS`, `FAILURE`,
    /// `CANCEL` or `CLOSED`.
    fn is_in_terminal_state(&self) -> bool {
        matches!(
            self.payment_result(),
            Some(
                PaymentResult::Success
                    | PaymentResult::Failure
                    | PaymentResult::Cancel
                    | PaymentResult::Closed
            )
        )
    }
}
