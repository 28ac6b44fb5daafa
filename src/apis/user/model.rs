use crate::params::ParameterSet;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

pub static DEFAULT_CERTIFICATE_TYPE: &str = "ID_CARD";

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub struct PersonalRegisterRequest {
    /// Member id on the partner platform.
    #[builder(setter(into))]
    pub uid: String,
    #[builder(setter(into))]
    pub real_name: String,
    #[builder(setter(into))]
    pub member_name: String,
    #[builder(setter(into))]
    pub certificate_no: String,
    #[builder(setter(into), default = "DEFAULT_CERTIFICATE_TYPE.to_string()")]
    pub certificate_type: String,
    #[builder(setter(into, strip_option), default)]
    pub mobile: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub email: Option<String>,
    /// Whether the identity has already been verified by the partner.
    #[builder(setter(strip_option), default)]
    pub is_verify: Option<bool>,
    /// Whether the member is activated on registration.
    #[builder(setter(strip_option), default)]
    pub is_active: Option<bool>,
    #[builder(setter(into, strip_option), default)]
    pub memo: Option<String>,
}

impl PersonalRegisterRequest {
    pub(crate) fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        params
            .insert("uid", self.uid.as_str())
            .insert("real_name", self.real_name.as_str())
            .insert("member_name", self.member_name.as_str())
            .insert("certificate_no", self.certificate_no.as_str())
            .insert("certificate_type", self.certificate_type.as_str())
            .insert_opt("mobile", self.mobile.as_deref())
            .insert_opt("email", self.email.as_deref())
            .insert("is_verify", verify_flag(self.is_verify))
            .insert("is_active", active_flag(self.is_active))
            .insert_opt("memo", self.memo.as_deref());
        params
    }
}

/// Changes to the profile of a personal member. Absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
#[cfg_attr(not(feature = "compat"), non_exhaustive)]
pub struct PersonalInfoModifyRequest {
    #[builder(setter(into))]
    pub uid: String,
    #[builder(setter(into, strip_option), default)]
    pub real_name: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub member_name: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub certificate_no: Option<String>,
    #[builder(setter(into), default = "DEFAULT_CERTIFICATE_TYPE.to_string()")]
    pub certificate_type: String,
    #[builder(setter(into, strip_option), default)]
    pub mobile: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub email: Option<String>,
    #[builder(setter(strip_option), default)]
    pub is_verify: Option<bool>,
    #[builder(setter(into, strip_option), default)]
    pub memo: Option<String>,
}

impl PersonalInfoModifyRequest {
    pub(crate) fn to_params(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        params
            .insert("uid", self.uid.as_str())
            .insert_opt("real_name", self.real_name.as_deref())
            .insert_opt("member_name", self.member_name.as_deref())
            .insert_opt("certificate_no", self.certificate_no.as_deref())
            .insert("certificate_type", self.certificate_type.as_str())
            .insert_opt("mobile", self.mobile.as_deref())
            .insert_opt("email", self.email.as_deref())
            .insert("is_verify", verify_flag(self.is_verify))
            .insert_opt("memo", self.memo.as_deref());
        params
    }
}

// Unset flags are sent as empty strings, not omitted.
fn verify_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "Y",
        Some(false) => "N",
        None => "",
    }
}

fn active_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "T",
        Some(false) => "F",
        None => "",
    }
}
