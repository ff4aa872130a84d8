use core::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};

use toad_msg::Id;

use crate::config::Config;
use crate::error::AddressError;
use crate::resolve::{self, Hints, Resolve, ResolveError};
use crate::{uri, Family, InAddr, Key, SecurityMode, SockAddr};

/// A CoAP endpoint: a (security mode, address, port) triple that
/// messages are exchanged with.
///
/// Endpoints are created by a [`Registry`](crate::Registry), which hands out
/// one shared [`Arc<Endpoint>`](std::sync::Arc) per [`Key`]; an endpoint
/// never changes identity after creation.
///
/// Endpoints are also responsible for generating message IDs,
/// see [`Endpoint::next_message_id`].
#[derive(Debug)]
pub struct Endpoint {
  key: Key,
  sock_addr: SockAddr,
  uri_host: String,
  base_uri: String,
  config: Config,
  next_id: AtomicU16,
}

impl Endpoint {
  pub(crate) fn new(sock_addr: SockAddr,
                    security_mode: Option<SecurityMode>,
                    first_message_id: u16,
                    config: Config)
                    -> Self {
    let key = Key::of(&sock_addr, security_mode);
    let uri_host = match &sock_addr {
      | SockAddr::Ip(addr) => match addr.ip() {
        | IpAddr::V4(v4) => v4.to_string(),
        | IpAddr::V6(v6) => format!("[{}]", v6),
      },
      | SockAddr::Name { name, .. } => name.clone(),
    };

    let mut ep = Endpoint { key,
                            sock_addr,
                            uri_host,
                            base_uri: String::new(),
                            config,
                            next_id: AtomicU16::new(first_message_id) };
    ep.base_uri = uri::compose(&ep, ep.uri_host(), ep.port(), &[]);
    ep
  }

  /// The identity of this endpoint
  pub fn key(&self) -> &Key {
    &self.key
  }

  /// Address family (never [`Family::Unspecified`])
  pub fn family(&self) -> Family {
    self.key.family
  }

  /// Canonical binary address
  pub fn in_addr(&self) -> &InAddr {
    &self.key.in_addr
  }

  /// Port
  pub fn port(&self) -> u16 {
    self.key.port
  }

  /// Security mode, `None` for NoSec
  pub fn security_mode(&self) -> Option<SecurityMode> {
    self.key.security_mode
  }

  /// Resolved socket address
  pub fn sock_addr(&self) -> &SockAddr {
    &self.sock_addr
  }

  /// The address as it appears in a URI's authority.
  ///
  /// IPv6 addresses are bracketed, [`Family::Name`] endpoints
  /// use their name verbatim.
  pub fn uri_host(&self) -> &str {
    &self.uri_host
  }

  /// `coaps` for secure endpoints, `coap` otherwise
  pub fn scheme(&self) -> &'static str {
    if self.is_secure() {
      "coaps"
    } else {
      "coap"
    }
  }

  /// Is [`Endpoint::security_mode`] anything but NoSec?
  pub fn is_secure(&self) -> bool {
    self.key.security_mode.is_some()
  }

  /// The config of the registry that created this endpoint
  pub fn config(&self) -> Config {
    self.config
  }

  /// The default port of this endpoint's [`Endpoint::scheme`]
  pub fn default_port(&self) -> u16 {
    self.config.default_port(self.is_secure())
  }

  /// The URI for this endpoint's root resource, e.g. `coap://[::1]/`.
  ///
  /// Relative URIs are resolved against this.
  pub fn base_uri(&self) -> &str {
    &self.base_uri
  }

  /// Get a message ID for a new message to this endpoint.
  ///
  /// IDs start at a random value (picked by the registry on creation)
  /// and count upward, wrapping from 65535 to 0.
  ///
  /// Safe to call concurrently; every call yields a different ID
  /// until the counter wraps.
  pub fn next_message_id(&self) -> Id {
    Id(self.next_id.fetch_add(1, Ordering::Relaxed))
  }

  #[cfg(test)]
  pub(crate) fn set_next_message_id(&self, id: u16) {
    self.next_id.store(id, Ordering::Relaxed)
  }

  /// Does `host` name the same address as this endpoint?
  ///
  /// `host` is never looked up by name; anything that is not a numeric
  /// literal of this endpoint's family (as judged by `resolver`) is not the same host.
  ///
  /// # Errors
  /// Resolver failures other than [`ResolveError::NoName`] are propagated.
  pub fn is_same_host<R: Resolve>(&self, resolver: &R, host: &str) -> Result<bool, AddressError> {
    let addr = match self.family() {
      | Family::Name => SockAddr::Name { name: host.to_string(),
                                         port: self.port() },
      | family => {
        let hints = Hints::datagram().numeric(true);
        match resolve::canonical(resolver, host, self.port(), family, hints) {
          | Ok(addr) => addr,
          | Err(ResolveError::NoName) => {
            log::trace!("{:?} is not a {:?} literal, not the same host", host, family);
            return Ok(false);
          },
          | Err(e) => return Err(AddressError::Resolve(e)),
        }
      },
    };

    Ok(addr.family() == self.family() && &InAddr::of(&addr) == self.in_addr())
  }
}

impl PartialEq for Endpoint {
  fn eq(&self, other: &Self) -> bool {
    self.key == other.key
  }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key.hash(state)
  }
}
