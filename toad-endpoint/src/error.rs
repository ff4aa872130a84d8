use core::fmt;

use crate::resolve::ResolveError;
use crate::Family;

/// Errors encounterable while resolving an [`Endpoint`](crate::Endpoint)
#[derive(Debug)]
pub enum AddressError {
  /// Neither a socket address nor a host was provided
  NoHost,
  /// A socket address was provided with an IP family
  /// but its host was not a numeric literal of that family
  NotLiteral {
    /// The family the literal was expected to be in
    family: Family,
    /// The text that failed to parse
    text: String,
  },
  /// The resolver failed
  Resolve(ResolveError),
}

impl fmt::Display for AddressError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | AddressError::NoHost => write!(f, "neither a socket address nor a host was provided"),
      | AddressError::NotLiteral { family, text } => {
        write!(f, "{:?} is not a numeric {:?} address", text, family)
      },
      | AddressError::Resolve(e) => write!(f, "resolution failed: {}", e),
    }
  }
}

impl std::error::Error for AddressError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      | AddressError::Resolve(e) => Some(e),
      | _ => None,
    }
  }
}

impl From<ResolveError> for AddressError {
  fn from(e: ResolveError) -> Self {
    AddressError::Resolve(e)
  }
}

/// Errors encounterable while translating between URIs and URI options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
  /// The URI (or the base it was resolved against) could not be parsed
  Parse(url::ParseError),
  /// The resolved URI has a fragment, or has neither an authority nor a path
  NotAbsolute(String),
  /// The resolved URI's scheme is not `coap` or `coaps`
  InvalidScheme(String),
  /// A Uri-Host option was empty
  EmptyHost,
  /// A Uri-Port option was empty
  EmptyPort,
  /// A Uri-Port option was longer than 2 bytes
  InvalidPort(Vec<u8>),
  /// A URI component or option value was not valid UTF-8
  /// after percent-decoding
  InvalidUtf8(String),
}

impl fmt::Display for UriError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | UriError::Parse(e) => write!(f, "invalid uri: {}", e),
      | UriError::NotAbsolute(uri) => write!(f, "{} is not an absolute coap uri", uri),
      | UriError::InvalidScheme(scheme) => write!(f, "{:?} is not a coap scheme", scheme),
      | UriError::EmptyHost => write!(f, "empty Uri-Host option"),
      | UriError::EmptyPort => write!(f, "empty Uri-Port option"),
      | UriError::InvalidPort(bytes) => write!(f, "Uri-Port option {:?} is too long", bytes),
      | UriError::InvalidUtf8(text) => write!(f, "{:?} is not valid utf-8", text),
    }
  }
}

impl std::error::Error for UriError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      | UriError::Parse(e) => Some(e),
      | _ => None,
    }
  }
}

impl From<url::ParseError> for UriError {
  fn from(e: url::ParseError) -> Self {
    UriError::Parse(e)
  }
}

/// Either an [`AddressError`] or a [`UriError`]
///
/// Translating a URI into options may need to resolve
/// the URI's host, so it can fail in either way.
#[derive(Debug)]
pub enum Error {
  /// See [`AddressError`]
  Address(AddressError),
  /// See [`UriError`]
  Uri(UriError),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Error::Address(e) => e.fmt(f),
      | Error::Uri(e) => e.fmt(f),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      | Error::Address(e) => Some(e),
      | Error::Uri(e) => Some(e),
    }
  }
}

impl From<AddressError> for Error {
  fn from(e: AddressError) -> Self {
    Error::Address(e)
  }
}

impl From<UriError> for Error {
  fn from(e: UriError) -> Self {
    Error::Uri(e)
  }
}

impl From<ResolveError> for Error {
  fn from(e: ResolveError) -> Self {
    Error::Address(AddressError::Resolve(e))
  }
}
