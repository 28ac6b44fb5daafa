use crate::{
    apis::instant_pay::generate_order_number,
    params::{format_amount, ParameterSet},
    Error,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub static DEFAULT_CARD_TYPE: &str = "DC";

/// Kind of bank account receiving a withdrawal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub enum CardAttribute {
    /// Personal account.
    #[default]
    #[serde(rename = "C")]
    Personal,
    /// Organisation account. Requires a bank line number.
    #[serde(rename = "B")]
    Organisation,
}

impl CardAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardAttribute::Personal => "C",
            CardAttribute::Organisation => "B",
        }
    }
}

/// Fees charged on a trade, in minor units.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Default)]
pub struct FeeInfo {
    pub buyer_fee_in_minor: u64,
}

impl FeeInfo {
    /// The composite value sent as `fee_info`.
    pub(crate) fn to_value(&self) -> Value {
        json!({ "buyerFee": format_amount(self.buyer_fee_in_minor) })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub struct WithdrawToCardRequest {
    /// Partner trade number. Generated when absent.
    #[builder(setter(into, strip_option), default)]
    pub outer_trade_no: Option<String>,
    /// Member withdrawing the funds.
    #[builder(setter(into))]
    pub uid: String,
    pub amount_in_minor: u64,
    #[builder(setter(strip_option), default)]
    pub fee_info: Option<FeeInfo>,
    #[builder(setter(into))]
    pub bank_account_no: String,
    #[builder(setter(into))]
    pub account_name: String,
    #[builder(setter(into), default = "DEFAULT_CARD_TYPE.to_string()")]
    pub card_type: String,
    #[builder(default)]
    pub card_attribute: CardAttribute,
    #[builder(setter(into, strip_option), default)]
    pub bank_line_no: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub bank_code: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub bank_name: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub bank_branch: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub bank_prov: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub bank_city: Option<String>,
    /// Overrides the notification URL of the configuration.
    #[builder(setter(into, strip_option), default)]
    pub notify_url: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub memo: Option<String>,
}

impl WithdrawToCardRequest {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let has_bank_line_no = self
            .bank_line_no
            .as_deref()
            .map_or(false, |n| !n.trim().is_empty());

        if self.card_attribute == CardAttribute::Organisation && !has_bank_line_no {
            return Err(Error::InvalidArgument(
                "bank_line_no is required for organisation accounts".into(),
            ));
        }

        Ok(())
    }

    pub(crate) fn to_params(&self, default_notify_url: Option<&str>) -> ParameterSet {
        let outer_trade_no = self
            .outer_trade_no
            .clone()
            .unwrap_or_else(generate_order_number);

        let mut params = ParameterSet::new();
        params
            .insert("outer_trade_no", outer_trade_no)
            .insert("uid", self.uid.as_str())
            .insert("amount", format_amount(self.amount_in_minor))
            .insert_opt("fee_info", self.fee_info.as_ref().map(FeeInfo::to_value))
            .insert("bank_account_no", self.bank_account_no.as_str())
            .insert("account_name", self.account_name.as_str())
            .insert("card_type", self.card_type.as_str())
            .insert("card_attribute", self.card_attribute.as_str())
            .insert_opt("bank_line_no", self.bank_line_no.as_deref())
            .insert_opt("bank_code", self.bank_code.as_deref())
            .insert_opt("bank_name", self.bank_name.as_deref())
            .insert_opt("bank_branch", self.bank_branch.as_deref())
            .insert_opt("bank_prov", self.bank_prov.as_deref())
            .insert_opt("bank_city", self.bank_city.as_deref())
            .insert_opt(
                "notify_url",
                self.notify_url.as_deref().or(default_notify_url),
            )
            .insert_opt("memo", self.memo.as_deref());
        params
    }
}
