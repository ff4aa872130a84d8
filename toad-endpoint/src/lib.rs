//! Addressing for the [`toad`](https://github.com/toad-lib/toad) CoAP runtime / ecosystem.
//!
//! This crate answers "who am I talking to" and "which resource":
//! - [`Registry`] resolves hosts and socket addresses into shared, deduplicated [`Endpoint`]s
//! - [`Endpoint`]s know their canonical address, their base URI, and hand out message IDs
//! - [`uri`] translates between URIs and the [`UriOpt`]ions that carry them in a message
//! - [`req::create_request`] ties the two together to build requests addressed by URI
//!
//! ```
//! use std::sync::Arc;
//!
//! use toad_endpoint::req::{create_request, MessageBuilder, RequestParams};
//! use toad_endpoint::{uri, Params, Registry, UriOpt};
//!
//! let registry = Registry::new();
//! let ep = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();
//!
//! assert_eq!(ep.uri_host(), "[::1]");
//! assert_eq!(ep.base_uri(), "coap://[::1]/");
//!
//! let again = registry.resolve(&Params::host("::1")).unwrap();
//! assert!(Arc::ptr_eq(&ep, &again));
//!
//! let opts = uri::to_options(registry.resolver(), &ep, "coap://coap.me:61616/hello").unwrap();
//! assert_eq!(opts,
//!            vec![UriOpt::Host("coap.me".into()),
//!                 UriOpt::Port(Some(61616)),
//!                 UriOpt::Path("hello".into())]);
//!
//! let _req = create_request(registry.resolver(),
//!                           &MessageBuilder,
//!                           &ep,
//!                           "/hello",
//!                           RequestParams::default()).unwrap();
//! ```

// docs
#![doc(html_root_url = "https://docs.rs/toad-endpoint/0.1.0")]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]

/// Registry config
pub mod config;

pub mod req;
pub mod resolve;
pub mod text;
pub mod uri;

mod addr;
mod endpoint;
mod error;
mod option;
mod registry;

pub(crate) mod logging;


#[doc(inline)]
pub use addr::{Family, InAddr, Key, SecurityMode, SockAddr};
#[doc(inline)]
pub use endpoint::Endpoint;
#[doc(inline)]
pub use error::{AddressError, Error, UriError};
#[doc(inline)]
pub use option::UriOpt;
#[doc(inline)]
pub use registry::{Params, Registry};

/// Default port for the `coap` scheme
pub const COAP_PORT: u16 = 5683;

/// Default port for the `coaps` scheme
pub const COAPS_PORT: u16 = 5684;
