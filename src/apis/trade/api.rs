use crate::{
    apis::{gateway::GatewayResponse, trade::WithdrawToCardRequest, MyBankClientInner},
    common::{SERVICE_TRADE_QUERY, SERVICE_WITHDRAW_TO_CARD},
    params::ParameterSet,
    Error,
};
use std::sync::Arc;

/// MYBank trade APIs client.
#[derive(Clone, Debug)]
pub struct TradeApi {
    inner: Arc<MyBankClientInner>,
}

impl TradeApi {
    pub(crate) fn new(inner: Arc<MyBankClientInner>) -> Self {
        Self { inner }
    }

    /// Withdraws funds of a member to a bank card.
    ///
    /// Organisation accounts without a bank line number are rejected before
    /// anything is sent.
    #[tracing::instrument(
        name = "Withdraw To Card",
        skip(self, request),
        fields(
            uid = %request.uid,
            amount_in_minor = request.amount_in_minor,
        )
    )]
    pub async fn withdraw_to_card(
        &self,
        request: &WithdrawToCardRequest,
    ) -> Result<Option<GatewayResponse>, Error> {
        request.validate()?;

        let params = request.to_params(self.inner.config.tc.notify_url.as_deref());
        self.inner
            .call_gateway(SERVICE_WITHDRAW_TO_CARD, params)
            .await
    }

    /// Gets the status of a trade by the partner trade number.
    #[tracing::instrument(name = "Query Trade", skip(self))]
    pub async fn query_trade(
        &self,
        outer_trade_no: &str,
    ) -> Result<Option<GatewayResponse>, Error> {
        if outer_trade_no.trim().is_empty() {
            return Err(Error::InvalidArgument("outer_trade_no is empty".into()));
        }

        self.inner
            .call_gateway(
                SERVICE_TRADE_QUERY,
                ParameterSet::new().with("outer_trade_no", outer_trade_no),
            )
            .await
    }
}
