//! # smarty-street - a typed client for the SmartyStreets US Street Address API
//!
//! Builds GET and POST lookups from address fields, enforces the provider's
//! field-combination rules before anything is sent, and decodes the answer
//! into read-only [`AddressCandidate`] records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use smarty_street::{AddressInput, Client, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smarty_street::Error> {
//!     let client = Client::builder()
//!         .credentials(Credentials::new("my-auth-id", "my-auth-token"))
//!         .build()?;
//!
//!     let input = AddressInput::new()
//!         .street("3214 N University Ave")
//!         .city("Provo")
//!         .state("UT")
//!         .candidates(3);
//!
//!     let response = client.get_address(&input, None).await?;
//!     for candidate in response.iter() {
//!         println!("{}, {}", candidate.delivery_line_1, candidate.last_line);
//!         println!("  deliverable: {}", candidate.analysis.dpv_match().is_deliverable());
//!     }
//!     println!("Request took {:?}", response.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Accepted inputs
//!
//! Each [`AddressInput`] needs one of:
//!
//! - street + city + state
//! - street + zipcode
//! - a free-form, single-line address
//!
//! Anything else fails with [`Error::Validation`] without touching the
//! network. Batches sent with [`Client::post_addresses`] validate every
//! entry and report all invalid ones at once through [`Error::InvalidBatch`].
//!
//! ## Error Handling
//!
//! Every non-200 status is an [`Error::HttpError`] carrying a [`StatusKind`]:
//!
//! ```no_run
//! use smarty_street::{AddressInput, Client, Error, StatusKind};
//!
//! # async fn example(client: Client, input: AddressInput) {
//! match client.get_address(&input, None).await {
//!     Ok(response) => println!("{} candidates", response.len()),
//!     Err(Error::HttpError { kind: StatusKind::Unauthorized, .. }) => {
//!         eprintln!("Check the auth id and token");
//!     }
//!     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
//!         eprintln!("Unexpected body {}: {}", raw_response, serde_error);
//!     }
//!     Err(e) => eprintln!("Lookup failed: {}", e),
//! }
//! # }
//! ```
//!
//! ## Testing without the network
//!
//! Requests pass through the [`transport::Transport`] trait as plain data.
//! [`ClientBuilder::build_with_transport`] swaps the default `reqwest`
//! transport for any other implementation.

pub mod address;
pub mod candidate;
mod client;
mod error;
pub mod request;
mod response;
pub mod transport;

pub use address::{AddressInput, AddressOptional, Addressing, Credentials};
pub use candidate::{AddressCandidate, Analysis, Components, DpvMatch, Metadata};
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use error::{BatchFailure, Error, Result, StatusKind, ValidationError};
pub use response::{parse_response, Response};
