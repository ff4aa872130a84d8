use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::error::AddressError;
use crate::text::to_net_unicode;

/// Address family of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
  /// Any family; resolution picks one.
  ///
  /// Endpoints never have this family, it only appears in
  /// requests to resolve an endpoint.
  Unspecified,
  /// IPv4
  Ipv4,
  /// IPv6
  Ipv6,
  /// Not a network address at all; the "host" is an opaque name.
  ///
  /// Used to create endpoints that don't correspond to a network node,
  /// e.g. in tests.
  Name,
}

impl Family {
  /// The family of an IP address
  pub fn of_ip(ip: &IpAddr) -> Self {
    match ip {
      | IpAddr::V4(_) => Family::Ipv4,
      | IpAddr::V6(_) => Family::Ipv6,
    }
  }

  /// Does an IP address belong to this family?
  ///
  /// [`Family::Unspecified`] admits every IP address, [`Family::Name`] admits none.
  pub fn admits(&self, ip: &IpAddr) -> bool {
    match self {
      | Family::Unspecified => true,
      | Family::Name => false,
      | f => *f == Family::of_ip(ip),
    }
  }

  /// Parse `text` as a numeric IP literal of this family.
  ///
  /// This is strict; host names are never accepted, and
  /// IPv4 literals are not mapped into IPv6.
  ///
  /// ```
  /// use toad_endpoint::Family;
  ///
  /// assert!(Family::Ipv6.parse_literal("::1").is_some());
  /// assert!(Family::Ipv6.parse_literal("127.0.0.1").is_none());
  /// assert!(Family::Unspecified.parse_literal("127.0.0.1").is_some());
  /// assert!(Family::Ipv4.parse_literal("localhost").is_none());
  /// ```
  pub fn parse_literal(&self, text: &str) -> Option<IpAddr> {
    match self {
      | Family::Ipv4 => text.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
      | Family::Ipv6 => text.parse::<Ipv6Addr>().ok().map(IpAddr::V6),
      | Family::Unspecified => text.parse::<IpAddr>().ok(),
      | Family::Name => None,
    }
  }
}

/// [RFC7252 Section 9](https://datatracker.ietf.org/doc/html/rfc7252#section-9)
/// DTLS security modes.
///
/// "NoSec" is represented by the absence of a security mode (`None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecurityMode {
  /// PreSharedKey
  PreSharedKey,
  /// RawPublicKey
  RawPublicKey,
  /// Certificate
  Certificate,
}

/// Canonical binary form of an endpoint's address
///
/// Text representations of IP addresses are ambiguous
/// (`::1` and `0:0:0:0:0:0:0:1` are the same address), so
/// identity uses the network-byte-order bytes instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InAddr {
  /// IPv4 address in network byte order
  V4([u8; 4]),
  /// IPv6 address in network byte order
  V6([u8; 16]),
  /// The Net-Unicode encoding of a [`Family::Name`] endpoint's name
  Name(Vec<u8>),
}

impl InAddr {
  /// Get the canonical form of a socket address
  pub fn of(addr: &SockAddr) -> Self {
    match addr {
      | SockAddr::Ip(SocketAddr::V4(v4)) => InAddr::V4(v4.ip().octets()),
      | SockAddr::Ip(SocketAddr::V6(v6)) => InAddr::V6(v6.ip().octets()),
      | SockAddr::Name { name, .. } => InAddr::Name(to_net_unicode(name)),
    }
  }
}

impl From<IpAddr> for InAddr {
  fn from(ip: IpAddr) -> Self {
    match ip {
      | IpAddr::V4(v4) => InAddr::V4(v4.octets()),
      | IpAddr::V6(v6) => InAddr::V6(v6.octets()),
    }
  }
}

/// The resolved address of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SockAddr {
  /// An IP socket address.
  ///
  /// IPv6 addresses keep their flow info and scope id.
  Ip(SocketAddr),
  /// A [`Family::Name`] endpoint's name and port
  Name {
    /// The name, used like a host but never resolved
    name: String,
    /// Port
    port: u16,
  },
}

impl SockAddr {
  /// The family of this address (never [`Family::Unspecified`])
  pub fn family(&self) -> Family {
    match self {
      | SockAddr::Ip(addr) => Family::of_ip(&addr.ip()),
      | SockAddr::Name { .. } => Family::Name,
    }
  }

  /// The port
  pub fn port(&self) -> u16 {
    match self {
      | SockAddr::Ip(addr) => addr.port(),
      | SockAddr::Name { port, .. } => *port,
    }
  }

  /// The IP socket address, if this is not a [`Family::Name`] address
  pub fn ip(&self) -> Option<SocketAddr> {
    match self {
      | SockAddr::Ip(addr) => Some(*addr),
      | SockAddr::Name { .. } => None,
    }
  }
}

impl From<SocketAddr> for SockAddr {
  fn from(addr: SocketAddr) -> Self {
    SockAddr::Ip(addr)
  }
}

/// The identity of an [`Endpoint`](crate::Endpoint).
///
/// At most one endpoint exists per key in a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
  /// Address family (never [`Family::Unspecified`])
  pub family: Family,
  /// Canonical binary address
  pub in_addr: InAddr,
  /// Port
  pub port: u16,
  /// Security mode, `None` for NoSec
  pub security_mode: Option<SecurityMode>,
}

impl Key {
  /// Derive a key from an address literal (or, for [`Family::Name`], a name) and port.
  ///
  /// # Errors
  /// Fails with [`AddressError::NotLiteral`] if `family` is an IP family
  /// and `host` is not a numeric literal in that family.
  pub fn for_literal(host: &str,
                     port: u16,
                     family: Family,
                     security_mode: Option<SecurityMode>)
                     -> Result<Self, AddressError> {
    let (family, in_addr) = match family {
      | Family::Name => (Family::Name, InAddr::Name(to_net_unicode(host))),
      | f => f.parse_literal(host)
              .map(|ip| (Family::of_ip(&ip), InAddr::from(ip)))
              .ok_or_else(|| AddressError::NotLiteral { family: f,
                                                        text: host.to_string() })?,
    };

    Ok(Key { family,
             in_addr,
             port,
             security_mode })
  }

  /// Derive a key from a resolved address
  pub fn of(addr: &SockAddr, security_mode: Option<SecurityMode>) -> Self {
    Key { family: addr.family(),
          in_addr: InAddr::of(addr),
          port: addr.port(),
          security_mode }
  }
}
