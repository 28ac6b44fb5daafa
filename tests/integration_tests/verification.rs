use crate::common::test_context::{TestContext, OID_PARTNER, PARTNER_ID};
use mybank_rust::params::ParameterSet;
use serde_json::json;

fn trade_notification() -> ParameterSet {
    ParameterSet::new()
        .with("notify_id", "0f6a3b2c9d")
        .with("notify_type", "trade_status_sync")
        .with("partner_id", PARTNER_ID)
        .with("outer_trade_no", "202101011200000000001234")
        .with("trade_status", "TRADE_FINISHED")
        .with("trade_amount", "100.50")
        .with("memo", "a&b=c 工资")
}

fn payment_notification() -> ParameterSet {
    ParameterSet::new()
        .with("oid_partner", OID_PARTNER)
        .with("no_order", "202101011200000000001234")
        .with("oid_paybill", "2021000000000001")
        .with("money_order", "123.45")
        .with("result_pay", "SUCCESS")
        .with("settle_date", "20210101")
        .with("info_order", "salary")
}

#[tokio::test]
async fn mybank_notification_posted_as_form() {
    let ctx = TestContext::start().await;
    let body = ctx.sign_as_mybank(trade_notification()).to_query_string();

    let params = ParameterSet::from_form_urlencoded(&body);
    let res = ctx.client.verify_signature(&params);

    assert!(res.verified);
    assert_eq!(res.params.get_str("memo"), Some("a&b=c 工资"));
    assert!(!res.params.contains_key("sign"));
}

#[tokio::test]
async fn tampered_mybank_notification() {
    let ctx = TestContext::start().await;
    let mut params = ctx.sign_as_mybank(trade_notification());
    params.insert("trade_amount", "1000.50");

    assert!(!ctx.client.verify_signature(&params).verified);
}

#[tokio::test]
async fn mybank_notification_with_unsupported_sign_type() {
    let ctx = TestContext::start().await;
    let mut params = ctx.sign_as_mybank(trade_notification());
    params.insert("sign_type", "TWSIGN");

    assert!(!ctx.client.verify_signature(&params).verified);
}

#[tokio::test]
async fn lianlian_notification_posted_as_json() {
    let ctx = TestContext::start().await;
    let body = ctx
        .sign_as_lianlian(payment_notification())
        .to_json_string()
        .unwrap();

    let params = ParameterSet::from_json_str(&body).unwrap();

    assert!(ctx.client.instant_pay.verify_signature(&params).verified);
}

#[tokio::test]
async fn lianlian_notification_signs_sign_type() {
    let ctx = TestContext::start().await;
    let mut params = ctx.sign_as_lianlian(payment_notification());
    assert!(ctx.client.instant_pay.verify_signature(&params).verified);

    params.insert("sign_type", "rsa");
    assert!(!ctx.client.instant_pay.verify_signature(&params).verified);
}

#[tokio::test]
async fn notifications_are_checked_against_their_own_key() {
    let ctx = TestContext::start().await;

    let from_mybank = ctx.sign_as_mybank(trade_notification());
    assert!(!ctx.client.instant_pay.verify_signature(&from_mybank).verified);

    let from_lianlian = ctx.sign_as_lianlian(payment_notification());
    assert!(!ctx.client.verify_signature(&from_lianlian).verified);
}

#[tokio::test]
async fn null_values_are_not_signed() {
    let ctx = TestContext::start().await;
    let mut params = ctx.sign_as_lianlian(payment_notification());
    params.insert("memo", json!(null));

    assert!(ctx.client.instant_pay.verify_signature(&params).verified);
}
