use crate::{
    apis::{
        gateway::GatewayResponse,
        user::{PersonalInfoModifyRequest, PersonalRegisterRequest},
        MyBankClientInner,
    },
    common::{
        SERVICE_ENTERPRISE_REGISTER, SERVICE_PARTNER_BALANCE_QUERY, SERVICE_PERSONAL_INFO_MODIFY,
        SERVICE_PERSONAL_REGISTER,
    },
    params::ParameterSet,
    Error,
};
use std::sync::Arc;

/// MYBank member APIs client.
#[derive(Clone, Debug)]
pub struct UserApi {
    inner: Arc<MyBankClientInner>,
}

impl UserApi {
    pub(crate) fn new(inner: Arc<MyBankClientInner>) -> Self {
        Self { inner }
    }

    /// Registers a personal member.
    ///
    /// Returns `None` if the gateway answered with an empty body.
    #[tracing::instrument(
        name = "Personal Register",
        skip(self, request),
        fields(uid = %request.uid)
    )]
    pub async fn personal_register(
        &self,
        request: &PersonalRegisterRequest,
    ) -> Result<Option<GatewayResponse>, Error> {
        self.inner
            .call_gateway(SERVICE_PERSONAL_REGISTER, request.to_params())
            .await
    }

    /// Registers an enterprise member.
    #[tracing::instrument(name = "Enterprise Register", skip(self, enterprise_name, memo))]
    pub async fn enterprise_register(
        &self,
        uid: &str,
        enterprise_name: &str,
        memo: Option<&str>,
    ) -> Result<Option<GatewayResponse>, Error> {
        let mut params = ParameterSet::new();
        params
            .insert("uid", uid)
            .insert("enterprise_name", enterprise_name)
            .insert_opt("memo", memo);

        self.inner
            .call_gateway(SERVICE_ENTERPRISE_REGISTER, params)
            .await
    }

    /// Modifies the profile of a personal member.
    #[tracing::instrument(
        name = "Personal Info Modify",
        skip(self, request),
        fields(uid = %request.uid)
    )]
    pub async fn personal_info_modify(
        &self,
        request: &PersonalInfoModifyRequest,
    ) -> Result<Option<GatewayResponse>, Error> {
        self.inner
            .call_gateway(SERVICE_PERSONAL_INFO_MODIFY, request.to_params())
            .await
    }

    /// Queries the balance of the partner account.
    #[tracing::instrument(name = "Partner Balance Query", skip(self))]
    pub async fn partner_balance_query(
        &self,
        memo: Option<&str>,
    ) -> Result<Option<GatewayResponse>, Error> {
        let mut params = ParameterSet::new();
        params.insert_opt("memo", memo);

        self.inner
            .call_gateway(SERVICE_PARTNER_BALANCE_QUERY, params)
            .await
    }
}
