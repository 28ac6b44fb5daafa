//! Rust client for the [MYBank](https://www.mybank.cn) "tc" gateway and the LianLian
//! instant-pay gateway.
//!
//! Every request is a flat set of parameters, signed over its canonical string
//! (see [`params`]) before being sent. MYBank requests are signed with a PKCS#7 detached
//! signature (`TWSIGN`) or with an RSA private key. Instant-pay requests are RSA/MD5 signed
//! and, for payments, encrypted into a `pay_load` envelope.
//!
//! # Usage
//!
//! ## Configuration
//!
//! The client is built from a [`Config`](crate::config::Config), usually loaded from a file
//! with environment overrides:
//!
//! ```toml
//! production = false
//!
//! [http]
//! timeout_secs = 5
//!
//! [tc]
//! partner_id = "200001234567"
//! sign_type = "TWSIGN"
//! cert_path = "/etc/mybank/partner.p12"
//! cert_password = "secret"
//! public_key = "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA..."
//! notify_url = "https://partner.example.com/mybank/notify"
//!
//! [instant_pay]
//! oid_partner = "201103171000000000"
//! platform = "partner.example.com"
//! private_key = "MIICXQIBAAKBgQC..."
//! ll_public_key = "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQC..."
//! notify_url = "https://partner.example.com/lianlian/notify"
//! ```
//!
//! ```rust,no_run
//! # use mybank_rust::{config::Config, Error, MyBankClient};
//! # fn main() -> Result<(), Error> {
//! let config = Config::load("mybank.toml")?;
//! let client = MyBankClient::new(config)?;
//! # Ok(())
//! # }
//! ```
//!
//! The `production` flag selects the gateway hosts. To connect somewhere else,
//! use [`with_environment`](crate::client::MyBankClientBuilder::with_environment).
//!
//! ## Register a member
//!
//! ```rust,no_run
//! # use mybank_rust::{MyBankClient, Error, apis::user::*};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let client: MyBankClient = unreachable!();
//! #
//! let request = PersonalRegisterRequestBuilder::default()
//!     .uid("u1001")
//!     .real_name("张三")
//!     .member_name("zhangsan")
//!     .certificate_no("110101199003077777")
//!     .mobile("13800000000")
//!     .build()
//!     .unwrap();
//!
//! if let Some(res) = client.user.personal_register(&request).await? {
//!     let res = res.ensure_success()?;
//!     println!("Registered: {:?}", res.fields);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pay to a bank card and wait for the result
//!
//! ```rust,no_run
//! # use mybank_rust::{MyBankClient, Error, PollableUntilTerminalState};
//! # use mybank_rust::{apis::instant_pay::*, pollable::PollOptions};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let client: MyBankClient = unreachable!();
//! #
//! let request = PaymentRequestBuilder::default()
//!     .money_order_in_minor(1000)
//!     .card_no("6222020000000000000")
//!     .acct_name("张三")
//!     .info_order("Salary")
//!     .memo("工资")
//!     .build()
//!     .unwrap();
//!
//! let res = client
//!     .instant_pay
//!     .payment(&request)
//!     .await?
//!     .ok_or("Empty response")?
//!     .ensure_success()?;
//!
//! let settled = res
//!     .poll_until_terminal_state(&client, PollOptions::default())
//!     .await?;
//! println!("Payment {:?}: {:?}", settled.no_order, settled.payment_result());
//! # Ok(())
//! # }
//! ```
//!
//! ## Verify a notification
//!
//! ```rust,no_run
//! # use mybank_rust::{MyBankClient, params::ParameterSet};
//! # let client: MyBankClient = unreachable!();
//! # let body = "";
//! let params = ParameterSet::from_form_urlencoded(body);
//! if !client.verify_signature(&params).verified {
//!     tracing::warn!("Rejected notification with an invalid signature");
//! }
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub mod client;
mod common;
pub mod config;
pub mod error;
pub mod executor;
mod middlewares;
pub mod params;
pub mod pollable;
pub mod signing;

pub use apis::instant_pay::generate_order_number;
pub use client::MyBankClient;
pub use error::Error;
pub use pollable::{Pollable, PollableUntilTerminalState};
