use toad_msg::OptNumber;

use crate::error::UriError;

/// A URI option
///
/// See [RFC7252 Section 5.10.1](https://datatracker.ietf.org/doc/html/rfc7252#section-5.10.1)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UriOpt {
  /// Uri-Host: the host of the resource, when it is not the endpoint's address
  Host(String),
  /// Uri-Port: the port of the resource, when it is not the endpoint's port.
  ///
  /// `None` is an empty option value. It decodes
  /// from the wire, but does not translate into a URI.
  ///
  /// Port 0 is sent as an empty value, so it comes back off the wire
  /// as `Port(None)` and is rejected by [`from_options`](crate::uri::from_options).
  /// Port 0 is not addressable, so this is intended.
  Port(Option<u16>),
  /// Uri-Path: one segment of the resource's path
  Path(String),
  /// Uri-Query: one `&`-separated clause of the resource's query
  Query(String),
}

impl UriOpt {
  /// Option number of Uri-Host
  pub const HOST: OptNumber = OptNumber(3);
  /// Option number of Uri-Port
  pub const PORT: OptNumber = OptNumber(7);
  /// Option number of Uri-Path
  pub const PATH: OptNumber = OptNumber(11);
  /// Option number of Uri-Query
  pub const QUERY: OptNumber = OptNumber(15);

  /// The option number
  pub fn number(&self) -> OptNumber {
    match self {
      | UriOpt::Host(_) => Self::HOST,
      | UriOpt::Port(_) => Self::PORT,
      | UriOpt::Path(_) => Self::PATH,
      | UriOpt::Query(_) => Self::QUERY,
    }
  }

  /// The option value as it would be sent.
  ///
  /// Strings are sent as UTF-8, ports as
  /// [minimal-length](https://datatracker.ietf.org/doc/html/rfc7252#section-3.2)
  /// big-endian unsigned integers.
  ///
  /// ```
  /// use toad_endpoint::UriOpt;
  ///
  /// assert_eq!(UriOpt::Port(Some(0)).value_bytes(), Vec::<u8>::new());
  /// assert_eq!(UriOpt::Port(Some(255)).value_bytes(), vec![255]);
  /// assert_eq!(UriOpt::Port(Some(5683)).value_bytes(), vec![0x16, 0x33]);
  /// assert_eq!(UriOpt::Path("a".into()).value_bytes(), b"a".to_vec());
  /// ```
  pub fn value_bytes(&self) -> Vec<u8> {
    match self {
      | UriOpt::Host(s) | UriOpt::Path(s) | UriOpt::Query(s) => s.as_bytes().to_vec(),
      | UriOpt::Port(None) => vec![],
      | UriOpt::Port(Some(port)) => {
        let bytes = port.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        bytes[skip..].to_vec()
      },
    }
  }

  /// Decode a URI option from a raw option number and value.
  ///
  /// Yields `Ok(None)` if `number` is not a URI option number.
  ///
  /// ```
  /// use toad_endpoint::UriOpt;
  /// use toad_msg::OptNumber;
  ///
  /// assert_eq!(UriOpt::from_raw(OptNumber(7), &[0x16, 0x33]),
  ///            Ok(Some(UriOpt::Port(Some(5683)))));
  /// assert_eq!(UriOpt::from_raw(OptNumber(7), &[]), Ok(Some(UriOpt::Port(None))));
  /// assert_eq!(UriOpt::from_raw(OptNumber(12), &[0]), Ok(None));
  /// ```
  pub fn from_raw(number: OptNumber, bytes: &[u8]) -> Result<Option<Self>, UriError> {
    let string = || {
      String::from_utf8(bytes.to_vec()).map_err(|e| {
                                         UriError::InvalidUtf8(String::from_utf8_lossy(e.as_bytes()).into_owned())
                                       })
    };

    match number {
      | n if n == Self::HOST => string().map(UriOpt::Host).map(Some),
      | n if n == Self::PATH => string().map(UriOpt::Path).map(Some),
      | n if n == Self::QUERY => string().map(UriOpt::Query).map(Some),
      | n if n == Self::PORT => match bytes {
        | [] => Ok(Some(UriOpt::Port(None))),
        | [b] => Ok(Some(UriOpt::Port(Some(u16::from(*b))))),
        | [hi, lo] => Ok(Some(UriOpt::Port(Some(u16::from_be_bytes([*hi, *lo]))))),
        | _ => Err(UriError::InvalidPort(bytes.to_vec())),
      },
      | _ => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numbers() {
    assert_eq!(UriOpt::Host("h".into()).number(), OptNumber(3));
    assert_eq!(UriOpt::Port(Some(1)).number(), OptNumber(7));
    assert_eq!(UriOpt::Path("p".into()).number(), OptNumber(11));
    assert_eq!(UriOpt::Query("q".into()).number(), OptNumber(15));
  }

  #[test]
  fn raw_values_decode() {
    for opt in [UriOpt::Host("coap.me".into()),
                UriOpt::Port(Some(61616)),
                UriOpt::Port(Some(1)),
                UriOpt::Path("sensors".into()),
                UriOpt::Query("x=1".into())]
    {
      assert_eq!(UriOpt::from_raw(opt.number(), &opt.value_bytes()), Ok(Some(opt.clone())));
    }
  }

  #[test]
  fn zero_port_is_empty_on_the_wire() {
    assert_eq!(UriOpt::Port(Some(0)).value_bytes(), UriOpt::Port(None).value_bytes());
    assert_eq!(UriOpt::from_raw(UriOpt::PORT, &UriOpt::Port(Some(0)).value_bytes()),
               Ok(Some(UriOpt::Port(None))));
  }

  #[test]
  fn bad_values() {
    assert!(matches!(UriOpt::from_raw(UriOpt::PATH, &[0xff]),
                     Err(UriError::InvalidUtf8(_))));
    assert_eq!(UriOpt::from_raw(UriOpt::PORT, &[1, 2, 3]),
               Err(UriError::InvalidPort(vec![1, 2, 3])));
  }
}
