//! HTTP client for the spreadsheet-backed shift service.
//!
//! The remote service is an opaque web app: every operation is a POST of a
//! JSON object carrying an `action` field, answered with a
//! `{success|ok, error?, ...}` envelope. This crate owns the transport
//! (hyper + rustls, single in-flight request, bounded timeout) and the
//! envelope handling; typed wrappers per action live in the modules that
//! use them.

mod client;
mod config;
mod error;

pub use client::ApiClient;
pub use config::RemoteConfig;
pub use error::RemoteError;
