//! Client SDK for the WebToPay (Paysera) payment gateway.
//!
//! Builds signed payment request URLs, validates signed gateway callbacks,
//! downloads the payment-method catalog and replies to paid SMS messages.
//!
//! # Signatures
//!
//! - **Outbound** ([`RequestBuilder`]): `sign = md5(data + password)`
//! - **Inbound, shared secret** ([`Ss1SignChecker`]): same MAC in field `ss1`
//! - **Inbound, public key** (`Ss2SignChecker`, feature `ss2`): RSA/SHA-1
//!   signature in field `ss2`, verified against the gateway's PEM key
//!
//! # Quick example (payment URL)
//!
//! ```no_run
//! use webtopay::{Factory, PaymentFields, WebToPayConfig};
//!
//! # fn main() -> webtopay::Result<()> {
//! let factory = Factory::new(
//!     WebToPayConfig::new()
//!         .with_project_id("123")
//!         .with_password("secret"),
//! )?;
//!
//! let mut fields = PaymentFields::new();
//! fields.insert("orderid".into(), "1".into());
//! fields.insert("accepturl".into(), "https://shop.example/ok".into());
//! fields.insert("cancelurl".into(), "https://shop.example/cancel".into());
//! fields.insert("callbackurl".into(), "https://shop.example/callback".into());
//!
//! let url = factory.request_builder()?.build_request_url(&fields)?;
//! # let _ = url;
//! # Ok(())
//! # }
//! ```

// Wire format and crypto primitives
pub mod codec;
pub mod constants;
pub mod error;
pub mod security;
pub mod sign;

// Protocol operations
pub mod callback;
pub mod request;
pub mod sms;
pub mod url_builder;

// Catalog
pub mod catalog;
pub mod provider;

// Transport and wiring
pub mod config;
pub mod facade;
pub mod factory;
pub mod http_client;

// Re-exports
pub use callback::{check_expected_fields, CallbackEvent, CallbackValidator, PaymentType};
pub use catalog::{PaymentMethod, PaymentMethodCountry, PaymentMethodGroup, PaymentMethodList};
pub use config::WebToPayConfig;
pub use error::{CallbackErrorKind, Result, ValidationErrorKind, WebToPayError};
pub use factory::Factory;
pub use http_client::{Transport, WebClient};
pub use provider::PaymentMethodListProvider;
pub use request::{PaymentFields, RequestBuilder, SignedRequest};
pub use sign::{SignChecker, Ss1SignChecker};
#[cfg(feature = "ss2")]
pub use sign::Ss2SignChecker;
pub use sms::SmsAnswerSender;
pub use url_builder::{Environment, Routes, UrlBuilder};
