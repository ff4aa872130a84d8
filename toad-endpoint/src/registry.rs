use core::fmt;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use toad_stem::Stem;

use crate::config::Config;
use crate::error::AddressError;
use crate::resolve::{self, Hints, Resolve, StdResolver};
use crate::{logging, Endpoint, Family, Key, SecurityMode, SockAddr, COAP_PORT};

/// Where to find an [`Endpoint`]
///
/// Either a socket address (a numeric literal and port, or a name and port for [`Family::Name`])
/// or a host and port to resolve.
///
/// ```
/// use toad_endpoint::{Family, Params, SecurityMode};
///
/// let by_addr = Params::sock_addr("::1", 5683);
/// let by_host = Params::host("coap.me").port(61616)
///                                      .family(Family::Ipv4)
///                                      .security_mode(SecurityMode::PreSharedKey);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Params {
  sock_addr: Option<(String, u16)>,
  host: Option<String>,
  port: u16,
  family: Family,
  security_mode: Option<SecurityMode>,
}

impl Params {
  /// An endpoint at a numeric address literal and port
  pub fn sock_addr(addr: impl ToString, port: u16) -> Self {
    Params { sock_addr: Some((addr.to_string(), port)),
             host: None,
             port,
             family: Family::Unspecified,
             security_mode: None }
  }

  /// An endpoint at a host (which may be a name) and the default `coap` port
  pub fn host(host: impl ToString) -> Self {
    Params { sock_addr: None,
             host: Some(host.to_string()),
             port: COAP_PORT,
             family: Family::Unspecified,
             security_mode: None }
  }

  /// Set the port used with [`Params::host`]
  pub fn port(mut self, port: u16) -> Self {
    self.port = port;
    self
  }

  /// Set the address family (default [`Family::Unspecified`])
  pub fn family(mut self, family: Family) -> Self {
    self.family = family;
    self
  }

  /// Set the security mode (default NoSec)
  pub fn security_mode(mut self, security_mode: SecurityMode) -> Self {
    self.security_mode = Some(security_mode);
    self
  }

  fn target(&self) -> Result<(&str, u16), AddressError> {
    match (&self.sock_addr, &self.host) {
      | (Some((addr, port)), _) => Ok((addr.as_str(), *port)),
      | (None, Some(host)) => Ok((host.as_str(), self.port)),
      | (None, None) => Err(AddressError::NoHost),
    }
  }
}

impl From<SocketAddr> for Params {
  fn from(addr: SocketAddr) -> Self {
    Params::sock_addr(addr.ip(), addr.port()).family(Family::of_ip(&addr.ip()))
  }
}

struct Inner {
  endpoints: BTreeMap<Key, Arc<Endpoint>>,
  rng: ChaCha8Rng,
}

impl fmt::Debug for Inner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Inner")
     .field("endpoints", &self.endpoints.len())
     .finish_non_exhaustive()
  }
}

/// The set of known [`Endpoint`]s
///
/// Resolving the same (family, address, port, security mode) twice
/// yields the same [`Arc<Endpoint>`], so endpoints can be compared with
/// [`Arc::ptr_eq`] and the message ID counter is never duplicated.
///
/// Safe to share between threads.
///
/// ```
/// use std::sync::Arc;
///
/// use toad_endpoint::{Params, Registry};
///
/// let registry = Registry::new();
/// let a = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();
/// let b = registry.resolve(&Params::sock_addr("0:0:0:0:0:0:0:1", 5683)).unwrap();
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug)]
pub struct Registry<R = StdResolver> {
  resolver: R,
  config: Config,
  inner: Stem<Inner>,
}

impl Registry<StdResolver> {
  /// A registry using the system resolver and default config
  pub fn new() -> Self {
    Self::with_resolver(StdResolver)
  }
}

impl Default for Registry<StdResolver> {
  fn default() -> Self {
    Self::new()
  }
}

impl<R: Resolve> Registry<R> {
  /// A registry using `resolver` and default config
  pub fn with_resolver(resolver: R) -> Self {
    Self::with_config(resolver, Config::default())
  }

  /// A registry using `resolver` and `config`
  pub fn with_config(resolver: R, config: Config) -> Self {
    let rng = match config.message_id_seed {
      | Some(seed) => ChaCha8Rng::seed_from_u64(seed),
      | None => ChaCha8Rng::from_entropy(),
    };

    Registry { resolver,
               config,
               inner: Stem::new(Inner { endpoints: BTreeMap::new(),
                                        rng }) }
  }

  /// The resolver used by this registry
  pub fn resolver(&self) -> &R {
    &self.resolver
  }

  /// The config used by this registry
  pub fn config(&self) -> Config {
    self.config
  }

  /// Get the endpoint for `params`, creating it if it does not exist yet.
  ///
  /// When `params` is a socket address, an existing endpoint is
  /// found without consulting the resolver.
  ///
  /// # Errors
  /// - [`AddressError::NotLiteral`] if `params` is a socket address whose address
  ///   is not a literal of the requested family
  /// - [`AddressError::NoHost`] if `params` has neither a socket address nor a host
  /// - [`AddressError::Resolve`] if resolution fails
  pub fn resolve(&self, params: &Params) -> Result<Arc<Endpoint>, AddressError> {
    if let Some(ep) = self.existing(params)? {
      log::trace!("{} already known", logging::endpoint_summary(&ep));
      return Ok(ep);
    }

    let sock_addr = self.canonical_sock_addr(params)?;
    let key = Key::of(&sock_addr, params.security_mode);

    let ep = self.inner.map_mut(|inner| {
                         let Inner { endpoints, rng } = inner;
                         endpoints.entry(key.clone())
                                  .or_insert_with(|| {
                                    let ep = Endpoint::new(sock_addr.clone(),
                                                           params.security_mode,
                                                           rng.gen(),
                                                           self.config);
                                    log::debug!("new endpoint {}", logging::endpoint_summary(&ep));
                                    Arc::new(ep)
                                  })
                                  .clone()
                       });

    Ok(ep)
  }

  /// Get the endpoint for `params` if it exists, never creating one.
  ///
  /// Hosts are still resolved to find the canonical address.
  ///
  /// # Errors
  /// See [`Registry::resolve`].
  pub fn lookup(&self, params: &Params) -> Result<Option<Arc<Endpoint>>, AddressError> {
    if let Some(ep) = self.existing(params)? {
      return Ok(Some(ep));
    }

    let sock_addr = self.canonical_sock_addr(params)?;
    let key = Key::of(&sock_addr, params.security_mode);

    Ok(self.get(&key))
  }

  /// Get the endpoint at `host` and `port` that `local` would exchange
  /// messages with, e.g. the sender of a datagram received on `local`'s socket.
  ///
  /// The peer has `local`'s family and security mode, and `host`
  /// must be a literal of that family (or, for [`Family::Name`], a name).
  ///
  /// # Errors
  /// See [`Registry::resolve`].
  pub fn peer_endpoint(&self,
                       local: &Endpoint,
                       host: &str,
                       port: u16)
                       -> Result<Arc<Endpoint>, AddressError> {
    let params = Params::sock_addr(host, port).family(local.family());
    let params = match local.security_mode() {
      | Some(mode) => params.security_mode(mode),
      | None => params,
    };

    self.resolve(&params)
  }

  /// [`Registry::peer_endpoint`] for a socket address,
  /// e.g. the source address of a received datagram
  ///
  /// # Errors
  /// See [`Registry::resolve`].
  pub fn peer_endpoint_at(&self, local: &Endpoint, addr: SocketAddr) -> Result<Arc<Endpoint>, AddressError> {
    self.peer_endpoint(local, &addr.ip().to_string(), addr.port())
  }

  /// The endpoint with identity `key`, if one has been created
  pub fn get(&self, key: &Key) -> Option<Arc<Endpoint>> {
    self.inner.map_ref(|inner| inner.endpoints.get(key).cloned())
  }

  /// The number of endpoints that have been created
  pub fn len(&self) -> usize {
    self.inner.map_ref(|inner| inner.endpoints.len())
  }

  /// Have no endpoints been created?
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Forget every endpoint.
  ///
  /// Endpoints that are still held elsewhere stay valid, but resolving
  /// their address again yields a new endpoint (with a new message ID counter).
  pub fn clear(&self) {
    self.inner.map_mut(|inner| inner.endpoints.clear())
  }

  fn existing(&self, params: &Params) -> Result<Option<Arc<Endpoint>>, AddressError> {
    match &params.sock_addr {
      | Some((addr, port)) => {
        let key = Key::for_literal(addr, *port, params.family, params.security_mode)?;
        Ok(self.get(&key))
      },
      | None => Ok(None),
    }
  }

  fn canonical_sock_addr(&self, params: &Params) -> Result<SockAddr, AddressError> {
    let (host, port) = params.target()?;

    match params.family {
      | Family::Name => Ok(SockAddr::Name { name: host.to_string(),
                                            port }),
      | family => {
        let hints = Hints::datagram().numeric(family.parse_literal(host).is_some());
        log::trace!("resolving {}:{} ({:?}, {:?})", host, port, family, hints);
        let res = resolve::canonical(&self.resolver, host, port, family, hints);
        match &res {
          | Ok(addr) => log::trace!("{}:{} resolved to {:?}", host, port, addr),
          | Err(e) => log::debug!("resolving {}:{} failed: {}", host, port, e),
        }
        res.map_err(AddressError::Resolve)
      },
    }
  }
}
