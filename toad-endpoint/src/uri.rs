//! Translating between URIs and URI options
//!
//! See [RFC7252 Section 6.4](https://datatracker.ietf.org/doc/html/rfc7252#section-6.4)
//! and [Section 6.5](https://datatracker.ietf.org/doc/html/rfc7252#section-6.5).
//!
//! Options are always relative to an [`Endpoint`]; a URI's host and port
//! only become Uri-Host and Uri-Port options when they differ from the endpoint's.
//!
//! ```
//! use toad_endpoint::{uri, Params, Registry, UriOpt};
//!
//! let registry = Registry::new();
//! let ep = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();
//!
//! let opts = uri::to_options(registry.resolver(), &ep, "coap://[::1]/a/b?x=1").unwrap();
//! assert_eq!(opts,
//!            vec![UriOpt::Path("a".into()),
//!                 UriOpt::Path("b".into()),
//!                 UriOpt::Query("x=1".into())]);
//!
//! assert_eq!(uri::from_options(&ep, &opts).unwrap(), "coap://[::1]/a/b?x=1");
//! ```

use core::fmt::Write;
use std::net::Ipv6Addr;

use url::{Host, Url};

use crate::error::{Error, UriError};
use crate::resolve::Resolve;
use crate::text::{self, url_quote, url_unquote};
use crate::{Endpoint, UriOpt};

/// Translate `uri` into URI options relative to `ep`.
///
/// `uri` may be relative; it is resolved against [`Endpoint::base_uri`].
///
/// # Errors
/// - [`UriError`] if the resolved URI is not an absolute `coap` or `coaps` URI
///   without a fragment, or has components that are not UTF-8
/// - [`AddressError`](crate::AddressError) if checking the URI's host against
///   `ep` fails for any reason other than the host not being a literal
pub fn to_options<R: Resolve>(resolver: &R, ep: &Endpoint, uri: &str) -> Result<Vec<UriOpt>, Error> {
  to_options_relative_to(resolver, ep, uri, ep.base_uri())
}

/// [`to_options`] with `uri` resolved against `base` instead of [`Endpoint::base_uri`]
pub fn to_options_relative_to<R: Resolve>(resolver: &R,
                                          ep: &Endpoint,
                                          uri: &str,
                                          base: &str)
                                          -> Result<Vec<UriOpt>, Error> {
  let url = Url::parse(base).and_then(|base| base.join(uri))
                            .map_err(UriError::Parse)?;
  log::trace!("{:?} relative to {:?} is {}", uri, base, url);

  let secure = match url.scheme() {
    | "coap" => false,
    | "coaps" => true,
    | other => return Err(UriError::InvalidScheme(other.to_string()).into()),
  };

  if url.fragment().is_some() || (!url.has_host() && url.path().is_empty()) {
    return Err(UriError::NotAbsolute(url.to_string()).into());
  }

  let mut opts = Vec::new();

  // coap is not a special scheme to `url`, so IPv4 literals arrive as domains
  let host = match url.host() {
    | Some(Host::Domain(name)) if !name.is_empty() => Some(unquote(name)?.to_lowercase()),
    | Some(Host::Ipv6(ip)) => Some(ip.to_string()),
    | _ => None,
  };

  if let Some(host) = host {
    if !ep.is_same_host(resolver, &host)? {
      opts.push(UriOpt::Host(host));
    }
  }

  let port = url.port().unwrap_or_else(|| ep.config().default_port(secure));
  if port != ep.port() {
    opts.push(UriOpt::Port(Some(port)));
  }

  let path = url.path();
  if !path.is_empty() && path != "/" {
    for segment in path.strip_prefix('/').unwrap_or(path).split('/') {
      opts.push(UriOpt::Path(unquote(segment)?));
    }
  }

  if let Some(query) = url.query().filter(|q| !q.is_empty()) {
    for clause in query.split('&') {
      opts.push(UriOpt::Query(unquote(clause)?));
    }
  }

  Ok(opts)
}

/// Reconstruct the absolute URI that `opts` address, relative to `ep`.
///
/// The scheme is always `ep`'s. A missing Uri-Host or Uri-Port
/// means `ep`'s host or port, and a port that is the scheme's default
/// is left out. When repeated, the first Uri-Host and the last Uri-Port win.
///
/// Non-URI options are not representable here; filter them out
/// with [`UriOpt::from_raw`] first.
///
/// # Errors
/// [`UriError::EmptyHost`] or [`UriError::EmptyPort`] if `opts` contains
/// an empty Uri-Host or Uri-Port.
pub fn from_options(ep: &Endpoint, opts: &[UriOpt]) -> Result<String, UriError> {
  let host = opts.iter().find_map(|o| match o {
                                    | UriOpt::Host(h) => Some(h),
                                    | _ => None,
                                  });
  let host = match host {
    | Some(h) if h.is_empty() => return Err(UriError::EmptyHost),
    | Some(h) => match bracketed_ipv6(h).or_else(|| h.parse::<Ipv6Addr>().ok()) {
      | Some(ip) => format!("[{}]", ip),
      | None => url_quote(h, text::HOST),
    },
    | None => ep.uri_host().to_string(),
  };

  let port = opts.iter().rev().find_map(|o| match o {
                                          | UriOpt::Port(p) => Some(*p),
                                          | _ => None,
                                        });
  let port = match port {
    | Some(None) => return Err(UriError::EmptyPort),
    | Some(Some(p)) => p,
    | None => ep.port(),
  };

  Ok(compose(ep, &host, port, opts))
}

/// Write out a URI with `ep`'s scheme, the given authority
/// and the path & query in `opts`
pub(crate) fn compose(ep: &Endpoint, host: &str, port: u16, opts: &[UriOpt]) -> String {
  let mut uri = format!("{}://{}", ep.scheme(), host);
  if port != ep.default_port() {
    write!(uri, ":{}", port).ok();
  }

  let mut path = opts.iter()
                     .filter_map(|o| match o {
                       | UriOpt::Path(seg) => Some(seg),
                       | _ => None,
                     })
                     .peekable();

  if path.peek().is_none() {
    uri.push('/');
  }

  path.for_each(|seg| {
        uri.push('/');
        uri.push_str(&url_quote(seg, text::PATH_SEGMENT));
      });

  let query = opts.iter()
                  .filter_map(|o| match o {
                    | UriOpt::Query(clause) => Some(url_quote(clause, text::QUERY_CLAUSE)),
                    | _ => None,
                  })
                  .collect::<Vec<_>>();

  if !query.is_empty() {
    uri.push('?');
    uri.push_str(&query.join("&"));
  }

  uri
}

fn bracketed_ipv6(host: &str) -> Option<Ipv6Addr> {
  host.strip_prefix('[')
      .and_then(|h| h.strip_suffix(']'))
      .and_then(|h| h.parse().ok())
}

fn unquote(text: &str) -> Result<String, UriError> {
  url_unquote(text).ok_or_else(|| UriError::InvalidUtf8(text.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::AddressError;
  use crate::resolve::ResolveError;
  use crate::test::ResolverMock;
  use crate::{Family, Params, Registry, SecurityMode};

  fn v6_registry() -> Registry<ResolverMock> {
    Registry::with_resolver(ResolverMock::new())
  }

  fn path(s: &str) -> UriOpt {
    UriOpt::Path(s.into())
  }

  fn query(s: &str) -> UriOpt {
    UriOpt::Query(s.into())
  }

  #[test]
  fn same_host_and_default_port_are_implied() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    let opts = to_options(reg.resolver(), &ep, "coap://[::1]/a/b?x=1").unwrap();
    assert_eq!(opts, vec![path("a"), path("b"), query("x=1")]);
  }

  #[test]
  fn relative_uris_resolve_against_the_endpoint() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 61616)).unwrap();

    assert_eq!(to_options(reg.resolver(), &ep, "/sensors/temp").unwrap(),
               vec![path("sensors"), path("temp")]);
    assert_eq!(to_options(reg.resolver(), &ep, "?x=1&y").unwrap(),
               vec![query("x=1"), query("y")]);
    assert_eq!(to_options(reg.resolver(), &ep, "").unwrap(), vec![]);
  }

  #[test]
  fn relative_to_another_base() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    let opts = to_options_relative_to(reg.resolver(), &ep, "c", "coap://[::1]/a/b").unwrap();
    assert_eq!(opts, vec![path("a"), path("c")]);
  }

  #[test]
  fn other_host_and_port_become_options() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    let opts = to_options(reg.resolver(), &ep, "coap://Coap.ME:61616/test").unwrap();
    assert_eq!(opts,
               vec![UriOpt::Host("coap.me".into()), UriOpt::Port(Some(61616)), path("test")]);

    let opts = to_options(reg.resolver(), &ep, "coap://[::2]/").unwrap();
    assert_eq!(opts, vec![UriOpt::Host("::2".into())]);
  }

  #[test]
  fn explicit_default_port_on_nondefault_endpoint() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 61616)).unwrap();

    let opts = to_options(reg.resolver(), &ep, "coap://[::1]/").unwrap();
    assert_eq!(opts, vec![UriOpt::Port(Some(5683))]);
  }

  #[test]
  fn coaps_default_port() {
    let reg = v6_registry();
    let params = Params::sock_addr("::1", 5684).security_mode(SecurityMode::PreSharedKey);
    let ep = reg.resolve(&params).unwrap();

    assert_eq!(ep.base_uri(), "coaps://[::1]/");
    assert_eq!(to_options(reg.resolver(), &ep, "coaps://[::1]/a").unwrap(),
               vec![path("a")]);
  }

  #[test]
  fn percent_encoding_is_decoded() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    let opts = to_options(reg.resolver(), &ep, "/a%2Fb/c%20d?k=a%26b").unwrap();
    assert_eq!(opts, vec![path("a/b"), path("c d"), query("k=a&b")]);

    assert_eq!(from_options(&ep, &opts).unwrap(),
               "coap://[::1]/a%2Fb/c%20d?k=a%26b");
  }

  #[test]
  fn trailing_slash_is_an_empty_segment() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    assert_eq!(to_options(reg.resolver(), &ep, "/a/").unwrap(),
               vec![path("a"), path("")]);
  }

  #[test]
  fn repeated_slashes_are_empty_segments() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    let opts = to_options(reg.resolver(), &ep, "coap://[::1]//a").unwrap();
    assert_eq!(opts, vec![path(""), path("a")]);
    assert_eq!(from_options(&ep, &opts).unwrap(), "coap://[::1]//a");

    assert_eq!(to_options(reg.resolver(), &ep, "coap://[::1]//").unwrap(),
               vec![path(""), path("")]);
    assert_eq!(to_options(reg.resolver(), &ep, "/a//b").unwrap(),
               vec![path("a"), path(""), path("b")]);
  }

  #[test]
  fn bad_uris() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();
    let r = reg.resolver();

    assert!(matches!(to_options(r, &ep, "coap://[::1]/a#frag"),
                     Err(Error::Uri(UriError::NotAbsolute(_)))));
    assert!(matches!(to_options(r, &ep, "http://[::1]/a"),
                     Err(Error::Uri(UriError::InvalidScheme(s))) if s == "http"));
    assert!(matches!(to_options(r, &ep, "/%FF"),
                     Err(Error::Uri(UriError::InvalidUtf8(_)))));
    assert!(matches!(to_options_relative_to(r, &ep, "a", "not a uri"),
                     Err(Error::Uri(UriError::Parse(_)))));
  }

  #[test]
  fn host_check_failures_propagate() {
    let reg = Registry::with_resolver(ResolverMock::new());
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    let down = ResolverMock::new().failing(|| ResolveError::NoResults);
    assert!(matches!(to_options(&down, &ep, "coap://[::1]/"),
                     Err(Error::Address(AddressError::Resolve(ResolveError::NoResults)))));
  }

  #[test]
  fn from_options_defaults_to_the_endpoint() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 61616)).unwrap();

    assert_eq!(from_options(&ep, &[]).unwrap(), "coap://[::1]:61616/");
    assert_eq!(from_options(&ep, &[path("a"), query("b")]).unwrap(),
               "coap://[::1]:61616/a?b");
    assert_eq!(from_options(&ep, &[UriOpt::Port(Some(5683))]).unwrap(),
               "coap://[::1]/");
  }

  #[test]
  fn from_options_hosts() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("10.0.0.1", 5683)).unwrap();

    assert_eq!(from_options(&ep, &[UriOpt::Host("::2".into())]).unwrap(),
               "coap://[::2]/");
    assert_eq!(from_options(&ep, &[UriOpt::Host("[::2]".into())]).unwrap(),
               "coap://[::2]/");
    assert_eq!(from_options(&ep, &[UriOpt::Host("[2001:db8::1]".into()), path("x")]).unwrap(),
               "coap://[2001:db8::1]/x");
    assert_eq!(from_options(&ep, &[UriOpt::Host("[not v6]".into())]).unwrap(),
               "coap://%5Bnot%20v6%5D/");
    assert_eq!(from_options(&ep, &[UriOpt::Host("coap.me".into())]).unwrap(),
               "coap://coap.me/");
    assert_eq!(from_options(&ep, &[UriOpt::Host("10.0.0.2".into())]).unwrap(),
               "coap://10.0.0.2/");
    assert_eq!(from_options(&ep,
                            &[UriOpt::Host("a".into()),
                              UriOpt::Port(Some(1)),
                              UriOpt::Host("b".into()),
                              UriOpt::Port(Some(2))]).unwrap(),
               "coap://a:2/");
  }

  #[test]
  fn from_options_rejects_empty_host_and_port() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("::1", 5683)).unwrap();

    assert_eq!(from_options(&ep, &[UriOpt::Host("".into())]),
               Err(UriError::EmptyHost));
    assert_eq!(from_options(&ep, &[UriOpt::Port(None)]),
               Err(UriError::EmptyPort));
  }

  #[test]
  fn name_endpoints() {
    let reg = v6_registry();
    let ep = reg.resolve(&Params::sock_addr("node", 5683).family(Family::Name))
                .unwrap();

    assert_eq!(to_options(reg.resolver(), &ep, "coap://node/x").unwrap(),
               vec![path("x")]);
    assert_eq!(to_options(reg.resolver(), &ep, "coap://other/x").unwrap(),
               vec![UriOpt::Host("other".into()), path("x")]);
    assert_eq!(reg.resolver().calls(), 0);
  }
}
