//! App Store Connect workflows for liftoff
//!
//! A thin JSON:API client authenticated with a signed ES256 token, and the
//! publishing steps built on it.
//!
//! ## Workflows
//!
//! - **bundle**: register the bundle identifier, resolve the app record
//! - **version**: create or reuse a store version, find the latest build,
//!   attach it, submit for review
//! - **metadata**: push listing text onto the app info and version localizations
//! - **screenshots**: replace screenshot sets through the reserve, upload, commit protocol
//!
//! Workflows return `Ok(false)` or `Ok(None)` when the API turns a request
//! down. `Err` is reserved for transport failures, unreadable local files and
//! malformed responses.
//!
//! ## Usage
//!
//! ```ignore
//! use liftoff_connect::{bundle, version, ConnectClient};
//!
//! let client = ConnectClient::new(&credentials)?;
//! let app_id = bundle::get_app_id(&client, &app).await?;
//! ```

pub mod auth;
pub mod bundle;
pub mod client;
pub mod error;
pub mod metadata;
pub mod screenshots;
pub mod types;
pub mod version;

pub use auth::AuthToken;
pub use client::ConnectClient;
pub use error::{ApiFailure, ApiOutcome, ConnectError, Result};
pub use screenshots::DisplayClass;
pub use types::{AppIdentity, Credentials, StoreVersion};
