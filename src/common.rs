// Default URLs
pub static DEFAULT_GATEWAY_URL: &str = "http://test.tc.mybank.cn/gop/gateway.do";
pub static DEFAULT_INSTANT_PAY_URL: &str = "https://instantpay.lianlianpay.com";
pub static DEFAULT_SANDBOX_GATEWAY_URL: &str = "http://test.tc.mybank.cn/gop/gateway.do";
pub static DEFAULT_SANDBOX_INSTANT_PAY_URL: &str = "https://test.lianlianpay-inc.com";

// MYBank services
pub static SERVICE_PERSONAL_REGISTER: &str = "mybank.tc.user.personal.register";
pub static SERVICE_ENTERPRISE_REGISTER: &str = "mybank.tc.user.enterprise.register";
pub static SERVICE_PERSONAL_INFO_MODIFY: &str = "mybank.tc.user.personal.info.modify";
pub static SERVICE_PARTNER_BALANCE_QUERY: &str = "mybank.tc.user.partner.balance.query";
pub static SERVICE_WITHDRAW_TO_CARD: &str = "mybank.tc.trade.withdrawtocard";
pub static SERVICE_TRADE_QUERY: &str = "mybank.tc.trade.query";

// Instant pay operations
pub static INSTANT_PAY_PAYMENT_PATH: &str = "/paymentapi/payment.htm";
pub static INSTANT_PAY_CONFIRM_PATH: &str = "/paymentapi/confirmPayment.htm";
pub static INSTANT_PAY_QUERY_PATH: &str = "/paymentapi/queryPayment.htm";

// Response codes
pub static GATEWAY_SUCCESS: &str = "T";
pub static INSTANT_PAY_SUCCESS: &str = "0000";
