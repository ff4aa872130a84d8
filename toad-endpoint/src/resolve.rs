//! Turning hosts into addresses

use core::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};

use crate::{Family, SockAddr};

/// The kind of socket that resolved addresses will be used with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SockType {
  /// UDP (and DTLS over UDP)
  Datagram,
  /// TCP (and TLS over TCP)
  Stream,
}

/// Hints for a [`Resolve`]r
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hints {
  /// The kind of socket addresses are wanted for
  pub sock_type: SockType,
  /// `host` must be a numeric literal; do not perform name lookups.
  ///
  /// Resolvers must fail with [`ResolveError::NoName`] when this is set
  /// and `host` is not a literal.
  pub numeric_host: bool,
}

impl Hints {
  /// Datagram sockets, names allowed
  pub const fn datagram() -> Self {
    Hints { sock_type: SockType::Datagram,
            numeric_host: false }
  }

  /// Copy of these hints with [`Hints::numeric_host`] set to `numeric_host`
  pub const fn numeric(self, numeric_host: bool) -> Self {
    Hints { numeric_host, ..self }
  }
}

impl Default for Hints {
  fn default() -> Self {
    Self::datagram()
  }
}

/// Errors encounterable by a [`Resolve`]r
#[derive(Debug)]
pub enum ResolveError {
  /// The name is not known (or, under [`Hints::numeric_host`],
  /// the host is not a numeric literal)
  NoName,
  /// Resolution succeeded but yielded no addresses in the requested family
  NoResults,
  /// Any other failure of the underlying resolver
  Io(io::Error),
}

impl fmt::Display for ResolveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | ResolveError::NoName => write!(f, "name not known"),
      | ResolveError::NoResults => write!(f, "no addresses found"),
      | ResolveError::Io(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for ResolveError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      | ResolveError::Io(e) => Some(e),
      | _ => None,
    }
  }
}

/// Address resolution
///
/// Implementors yield candidate addresses for `host` in preference order;
/// the first is the canonical address.
pub trait Resolve {
  /// Resolve `host` and `port` to socket addresses of `family`
  fn resolve(&self,
             host: &str,
             port: u16,
             family: Family,
             hints: Hints)
             -> Result<Vec<SockAddr>, ResolveError>;
}

impl<'a, R: Resolve> Resolve for &'a R {
  fn resolve(&self,
             host: &str,
             port: u16,
             family: Family,
             hints: Hints)
             -> Result<Vec<SockAddr>, ResolveError> {
    R::resolve(self, host, port, family, hints)
  }
}

/// [`Resolve`] using numeric literals and the system resolver
/// ([`ToSocketAddrs`]).
///
/// Under [`Family::Ipv6`], IPv4 literals are mapped into IPv6
/// (`::ffff:a.b.c.d`).
///
/// ```
/// use toad_endpoint::resolve::{Hints, Resolve, ResolveError, StdResolver};
/// use toad_endpoint::{Family, SockAddr};
///
/// let addrs = StdResolver.resolve("::1", 5683, Family::Unspecified, Hints::datagram())
///                        .unwrap();
/// assert_eq!(addrs, vec![SockAddr::Ip("[::1]:5683".parse().unwrap())]);
///
/// let strict = Hints::datagram().numeric(true);
/// assert!(matches!(StdResolver.resolve("coap.me", 5683, Family::Ipv4, strict),
///                  Err(ResolveError::NoName)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StdResolver;

impl StdResolver {
  fn literal(host: &str, family: Family) -> Option<IpAddr> {
    family.parse_literal(host).or_else(|| match family {
                                  | Family::Ipv6 => host.parse::<Ipv4Addr>()
                                                        .ok()
                                                        .map(|v4| IpAddr::V6(v4.to_ipv6_mapped())),
                                  | _ => None,
                                })
  }
}

impl Resolve for StdResolver {
  fn resolve(&self,
             host: &str,
             port: u16,
             family: Family,
             hints: Hints)
             -> Result<Vec<SockAddr>, ResolveError> {
    if family == Family::Name {
      return Ok(vec![SockAddr::Name { name: host.to_string(),
                                      port }]);
    }

    if let Some(ip) = Self::literal(host, family) {
      return Ok(vec![SockAddr::Ip(SocketAddr::new(ip, port))]);
    }

    if hints.numeric_host {
      return Err(ResolveError::NoName);
    }

    log::trace!("system lookup for {}:{} ({:?})", host, port, family);
    let addrs = (host, port).to_socket_addrs()
                            .map_err(ResolveError::Io)?
                            .filter(|addr| family.admits(&addr.ip()))
                            .map(SockAddr::Ip)
                            .collect::<Vec<_>>();

    if addrs.is_empty() {
      Err(ResolveError::NoResults)
    } else {
      Ok(addrs)
    }
  }
}

/// Resolve `host` to the canonical (first) address
pub(crate) fn canonical<R: Resolve>(resolver: &R,
                                    host: &str,
                                    port: u16,
                                    family: Family,
                                    hints: Hints)
                                    -> Result<SockAddr, ResolveError> {
  resolver.resolve(host, port, family, hints)?
          .into_iter()
          .next()
          .ok_or(ResolveError::NoResults)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn v4_literal_maps_into_v6() {
    let addrs = StdResolver.resolve("127.0.0.1", 1, Family::Ipv6, Hints::datagram())
                           .unwrap();
    assert_eq!(addrs,
               vec![SockAddr::Ip("[::ffff:127.0.0.1]:1".parse().unwrap())]);
  }

  #[test]
  fn wrong_family_literal_under_numeric_is_no_name() {
    let strict = Hints::datagram().numeric(true);
    assert!(matches!(StdResolver.resolve("::1", 1, Family::Ipv4, strict),
                     Err(ResolveError::NoName)));
  }

  #[test]
  fn name_family_is_passed_through() {
    let addrs = StdResolver.resolve("node", 7, Family::Name, Hints::datagram())
                           .unwrap();
    assert_eq!(addrs,
               vec![SockAddr::Name { name: "node".into(),
                                     port: 7 }]);
  }

  #[test]
  fn canonical_takes_the_first() {
    let addr = canonical(&StdResolver, "10.1.2.3", 9, Family::Ipv4, Hints::datagram()).unwrap();
    assert_eq!(addr, SockAddr::Ip("10.1.2.3:9".parse().unwrap()));
  }
}
