use crate::common::test_context::TestContext;
use mybank_rust::Error;

#[tokio::test]
async fn query_payment_requires_an_identifier() {
    let ctx = TestContext::start().await;

    let res = ctx.client.instant_pay.query_payment(None, None).await;
    assert!(matches!(res, Err(Error::InvalidArgument(_))));

    let res = ctx.client.instant_pay.query_payment(Some(""), Some("")).await;
    assert!(matches!(res, Err(Error::InvalidArgument(_))));
}

#[cfg(not(feature = "acceptance-tests"))]
mod mock_only {
    use crate::common::test_context::{TestContext, INSTANT_PAY_NOTIFY_URL, OID_PARTNER};
    use mybank_rust::{
        apis::instant_pay::{PaymentRequest, PaymentRequestBuilder, PaymentResult},
        generate_order_number,
        pollable::PollOptions,
        Error, PollableUntilTerminalState,
    };
    use retry_policies::policies::ExponentialBackoff;
    use std::time::Duration;

    fn payment_request(no_order: &str, card_no: &str) -> PaymentRequest {
        PaymentRequestBuilder::default()
            .no_order(no_order)
            .money_order_in_minor(12_345)
            .card_no(card_no)
            .acct_name("张三")
            .info_order("salary")
            .memo("工资")
            .build()
            .unwrap()
    }

    fn fast_poll_options() -> PollOptions<ExponentialBackoff> {
        PollOptions::default()
            .with_retry_policy(
                ExponentialBackoff::builder()
                    .retry_bounds(Duration::from_millis(10), Duration::from_millis(50))
                    .build_with_max_retries(5),
            )
            .with_min_wait(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn payment_is_sent_in_an_envelope() {
        let ctx = TestContext::start().await;
        let no_order = generate_order_number();

        let res = ctx
            .client
            .instant_pay
            .payment(&payment_request(&no_order, "6222020000000000001"))
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();

        assert_eq!(res.no_order.as_deref(), Some(no_order.as_str()));
        assert!(res.oid_paybill.is_some());
        assert!(
            ctx.client
                .instant_pay
                .verify_signature(&res.to_params().unwrap())
                .verified
        );

        let wire = ctx.mock_server().last_instant_pay_request().unwrap();
        assert_eq!(wire.len(), 2);
        assert_eq!(wire.get_str("oid_partner"), Some(OID_PARTNER));
        assert!(wire
            .get_str("pay_load")
            .unwrap()
            .starts_with("lianpay1_0_1$"));

        let payment = ctx.mock_server().payment(&no_order).unwrap();
        assert_eq!(payment.params.get_str("money_order"), Some("123.45"));
        assert_eq!(payment.params.get_str("api_version"), Some("1.0"));
        assert_eq!(payment.params.get_str("sign_type"), Some("RSA"));
        assert_eq!(payment.params.get_str("flag_card"), Some("0"));
        assert_eq!(
            payment.params.get_str("notify_url"),
            Some(INSTANT_PAY_NOTIFY_URL)
        );
        assert_eq!(payment.params.get_str("dt_order").unwrap().len(), 14);
    }

    #[tokio::test]
    async fn payment_generates_no_order() {
        let ctx = TestContext::start().await;

        let request = PaymentRequestBuilder::default()
            .money_order_in_minor(100)
            .card_no("6222020000000000002")
            .acct_name("李四")
            .info_order("refund")
            .memo("退款")
            .build()
            .unwrap();
        let res = ctx
            .client
            .instant_pay
            .payment(&request)
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();

        let no_order = res.no_order.unwrap();
        assert_eq!(no_order.len(), 24);
        assert!(ctx.mock_server().payment(&no_order).is_some());
    }

    #[tokio::test]
    async fn suspected_duplicate_payment_must_be_confirmed() {
        let ctx = TestContext::start().await;
        ctx.client
            .instant_pay
            .payment(&payment_request(
                &generate_order_number(),
                "6222020000000000003",
            ))
            .await
            .unwrap();

        // Same card and amount
        let no_order = generate_order_number();
        let res = ctx
            .client
            .instant_pay
            .payment(&payment_request(&no_order, "6222020000000000003"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(res.ret_code, "4002");
        let confirm_code = res.confirm_code.clone().unwrap();
        assert!(matches!(
            res.ensure_success(),
            Err(Error::GatewayError { ref code, .. }) if code == "4002"
        ));

        let res = ctx
            .client
            .instant_pay
            .confirm_payment(&no_order, "000000-wrong", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(res.ret_code, "4004");

        let res = ctx
            .client
            .instant_pay
            .confirm_payment(&no_order, &confirm_code, None)
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();
        assert_eq!(res.no_order.as_deref(), Some(no_order.as_str()));

        let wire = ctx.mock_server().last_instant_pay_request().unwrap();
        assert_eq!(wire.len(), 2);
        assert!(wire.contains_key("pay_load"));
        assert!(ctx.mock_server().payment(&no_order).unwrap().confirm_code.is_none());
    }

    #[tokio::test]
    async fn confirm_unknown_payment() {
        let ctx = TestContext::start().await;

        let res = ctx
            .client
            .instant_pay
            .confirm_payment("202101011200000000009999", "000001", None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(res.ret_code, "8901");
    }

    #[tokio::test]
    async fn query_payment_is_not_enveloped() {
        let ctx = TestContext::start().await;
        let no_order = generate_order_number();
        let res = ctx
            .client
            .instant_pay
            .payment(&payment_request(&no_order, "6222020000000000004"))
            .await
            .unwrap()
            .unwrap();

        let res = ctx
            .client
            .instant_pay
            .query_payment(None, res.oid_paybill.as_deref())
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();

        assert_eq!(res.no_order.as_deref(), Some(no_order.as_str()));
        assert_eq!(res.payment_result(), Some(PaymentResult::Processing));
        assert!(
            ctx.client
                .instant_pay
                .verify_signature(&res.to_params().unwrap())
                .verified
        );

        let wire = ctx.mock_server().last_instant_pay_request().unwrap();
        assert!(!wire.contains_key("pay_load"));
        assert!(!wire.contains_key("no_order"));
        assert_eq!(wire.get_str("api_version"), Some("1.0"));
        assert_eq!(wire.get_str("sign_type"), Some("RSA"));
        assert!(wire.get_str("sign").is_some());
    }

    #[tokio::test]
    async fn query_unknown_payment() {
        let ctx = TestContext::start().await;

        let res = ctx
            .client
            .instant_pay
            .query_payment(Some("202101011200000000009999"), None)
            .await
            .unwrap()
            .unwrap();

        assert!(!res.is_success());
        assert_eq!(res.ret_code, "8901");
    }

    #[tokio::test]
    async fn requests_without_identifiers_are_not_sent() {
        let ctx = TestContext::start().await;

        let res = ctx.client.instant_pay.query_payment(None, Some("")).await;

        assert!(matches!(res, Err(Error::InvalidArgument(_))));
        assert_eq!(ctx.mock_server().instant_pay_request_count(), 0);
    }

    #[tokio::test]
    async fn poll_payment_until_settled() {
        let ctx = TestContext::start().await;
        let no_order = generate_order_number();

        let res = ctx
            .client
            .instant_pay
            .payment(&payment_request(&no_order, "6222020000000000005"))
            .await
            .unwrap()
            .unwrap()
            .ensure_success()
            .unwrap();
        let res = res
            .poll_until_terminal_state(&ctx.client, fast_poll_options())
            .await
            .unwrap();

        assert_eq!(res.payment_result(), Some(PaymentResult::Success));
        assert_eq!(res.settle_date.as_deref(), Some("20210101"));
        assert_eq!(ctx.mock_server().payment(&no_order).unwrap().queried, 2);
    }
}
