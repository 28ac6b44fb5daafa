use crate::{common::test_context::TestContext, integration_tests::random_uid};
use mybank_rust::{
    apis::trade::{CardAttribute, WithdrawToCardRequestBuilder},
    Error,
};

#[tokio::test]
async fn organisation_withdrawal_requires_bank_line_no() {
    let ctx = TestContext::start().await;

    let request = WithdrawToCardRequestBuilder::default()
        .uid(random_uid())
        .amount_in_minor(10_000)
        .bank_account_no("6222020000000000000")
        .account_name("杭州某某科技有限公司")
        .card_attribute(CardAttribute::Organisation)
        .build()
        .unwrap();
    let res = ctx.client.trade.withdraw_to_card(&request).await;

    assert!(matches!(res, Err(Error::InvalidArgument(_))));
}

#[tokio::test]
async fn query_trade_requires_outer_trade_no() {
    let ctx = TestContext::start().await;

    let res = ctx.client.trade.query_trade(" ").await;

    assert!(matches!(res, Err(Error::InvalidArgument(_))));
}

#[cfg(not(feature = "acceptance-tests"))]
mod mock_only {
    use crate::{
        common::test_context::{TestContext, TC_NOTIFY_URL},
        integration_tests::random_uid,
    };
    use mybank_rust::{
        apis::trade::{CardAttribute, FeeInfo, WithdrawToCardRequestBuilder},
        Error,
    };

    async fn register_member(ctx: &TestContext) -> String {
        let uid = random_uid();
        ctx.client
            .user
            .enterprise_register(&uid, "杭州某某科技有限公司", None)
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();
        uid
    }

    #[tokio::test]
    async fn withdraw_to_card_and_query() {
        let ctx = TestContext::start().await;
        let uid = register_member(&ctx).await;

        let request = WithdrawToCardRequestBuilder::default()
            .outer_trade_no("202101011200000000001234")
            .uid(uid.as_str())
            .amount_in_minor(10_050)
            .fee_info(FeeInfo {
                buyer_fee_in_minor: 200,
            })
            .bank_account_no("6222020000000000000")
            .account_name("张三")
            .build()
            .unwrap();
        let res = ctx
            .client
            .trade
            .withdraw_to_card(&request)
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();

        assert_eq!(res.get_str("withdrawal_status"), Some("SUBMITTED"));
        assert!(ctx.client.verify_signature(&res.to_params().unwrap()).verified);

        let trade = ctx
            .mock_server()
            .trade("202101011200000000001234")
            .unwrap();
        assert_eq!(trade.params.get_str("amount"), Some("100.50"));
        assert_eq!(
            trade.params.get_str("fee_info"),
            Some(r#"{"buyerFee":"2.00"}"#)
        );
        assert_eq!(trade.params.get_str("card_type"), Some("DC"));
        assert_eq!(trade.params.get_str("card_attribute"), Some("C"));
        assert_eq!(trade.params.get_str("notify_url"), Some(TC_NOTIFY_URL));

        let res = ctx
            .client
            .trade
            .query_trade("202101011200000000001234")
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();

        assert_eq!(res.get_str("trade_status"), Some("SUCCESS"));
        assert_eq!(res.get_str("trade_amount"), Some("100.50"));
        assert_eq!(res.get_str("inner_trade_no"), Some(trade.inner_trade_no.as_str()));
    }

    #[tokio::test]
    async fn withdraw_to_card_generates_outer_trade_no() {
        let ctx = TestContext::start().await;
        let uid = register_member(&ctx).await;

        let request = WithdrawToCardRequestBuilder::default()
            .uid(uid.as_str())
            .amount_in_minor(1)
            .bank_account_no("6222020000000000000")
            .account_name("杭州某某科技有限公司")
            .card_attribute(CardAttribute::Organisation)
            .bank_line_no("102100099996")
            .notify_url("https://partner.example.com/other")
            .build()
            .unwrap();
        let res = ctx
            .client
            .trade
            .withdraw_to_card(&request)
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();

        let outer_trade_no = res.get_str("outer_trade_no").unwrap();
        assert_eq!(outer_trade_no.len(), 24);

        let trade = ctx.mock_server().trade(outer_trade_no).unwrap();
        assert_eq!(trade.params.get_str("amount"), Some("0.01"));
        assert_eq!(trade.params.get_str("bank_line_no"), Some("102100099996"));
        assert_eq!(
            trade.params.get_str("notify_url"),
            Some("https://partner.example.com/other")
        );
    }

    #[tokio::test]
    async fn invalid_withdrawals_are_not_sent() {
        let ctx = TestContext::start().await;
        let uid = register_member(&ctx).await;
        let sent = ctx.mock_server().gateway_request_count();

        let request = WithdrawToCardRequestBuilder::default()
            .uid(uid.as_str())
            .amount_in_minor(100)
            .bank_account_no("6222020000000000000")
            .account_name("杭州某某科技有限公司")
            .card_attribute(CardAttribute::Organisation)
            .bank_line_no("  ")
            .build()
            .unwrap();
        let res = ctx.client.trade.withdraw_to_card(&request).await;

        assert!(matches!(res, Err(Error::InvalidArgument(_))));
        assert_eq!(ctx.mock_server().gateway_request_count(), sent);
    }

    #[tokio::test]
    async fn withdrawal_of_unknown_member_fails() {
        let ctx = TestContext::start().await;

        let request = WithdrawToCardRequestBuilder::default()
            .uid("unknown")
            .amount_in_minor(100)
            .bank_account_no("6222020000000000000")
            .account_name("张三")
            .build()
            .unwrap();
        let res = ctx
            .client
            .trade
            .withdraw_to_card(&request)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(res.error_code.as_deref(), Some("MEMBER_NOT_EXIST"));
    }

    #[tokio::test]
    async fn query_unknown_trade() {
        let ctx = TestContext::start().await;

        let res = ctx
            .client
            .trade
            .query_trade("202101011200000000009999")
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            res.ensure_success(),
            Err(Error::GatewayError { ref code, .. }) if code == "TRADE_NOT_EXIST"
        ));
    }
}
