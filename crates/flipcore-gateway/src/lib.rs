//! # flipcore-gateway
//!
//! The HTTP boundary of the settlement engine. Everything here is incidental
//! plumbing around the Outcome Core: the x402 payment-header codec, the 402
//! capability document, and the stable error-to-status mapping clients rely
//! on.
//!
//! ## Wire Contract
//!
//! - `GET /` (or any request without an `X-PAYMENT` header) → HTTP 402 with
//!   the machine-readable capability document
//! - `POST /` with `X-PAYMENT: base64(JSON envelope)` → settles one wager
//! - every response carries permissive CORS headers; the payment signature
//!   itself is the only authentication
//!
//! Error mapping is an exhaustive match over typed error variants — no
//! message-string inspection anywhere.

pub mod capability;
pub mod routes;
pub mod x402;

pub use routes::{AppState, router};
pub use x402::{PaymentEnvelope, PaymentPayload, decode_payment_header, encode_payment_header};
