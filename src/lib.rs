//! tfe-client - Typed client for the HCP Terraform / Terraform Enterprise API
//!
//! Every operation goes through one request pipeline that validates
//! identifiers, builds JSON:API bodies, authenticates, sends over an
//! injectable transport and maps the response onto a small set of error
//! kinds.
//!
//! # Example
//!
//! ```no_run
//! use tfe_client::{ClientConfig, Context, ListOptions, TfeClient};
//!
//! # async fn example() -> tfe_client::Result<()> {
//! let client = TfeClient::new(ClientConfig::default().token("my-token"))?;
//! let ctx = Context::with_timeout(std::time::Duration::from_secs(30));
//!
//! let page = client.list_organizations(&ctx, ListOptions::page(1, 20)).await?;
//! for org in &page.items {
//!     println!("{}", org.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod resources;

pub use client::{
    default_http_client, valid_string_id, validate_id, CancelHandle, ClientConfig, Context, List,
    ListOptions, Request, Response, RetryPolicy, ServiceInfo, TfeClient, TokenResolver,
    TokenSource, Transport,
};
pub use error::{ErrorKind, Result, TfeError, TransportFailure};
pub use jsonapi::{Document, JsonApiType, Pagination, Relationship, Resource, ResourceIdentifier};
pub use resources::TfeResource;
