use toad_endpoint::req::{create_request, MessageBuilder, RequestParams};
use toad_endpoint::{uri, Error, Params, Registry, SecurityMode, UriError, UriOpt};
use toad_msg::{Code, OptNumber, OptValue, Type};
use url::Url;

fn path(s: &str) -> UriOpt {
  UriOpt::Path(s.into())
}

#[test]
fn absolute_uri_on_the_same_host() {
  let registry = Registry::new();
  let ep = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();

  let opts = uri::to_options(registry.resolver(), &ep, "coap://[::1]/a/b?x=1").unwrap();
  assert_eq!(opts,
             vec![path("a"), path("b"), UriOpt::Query("x=1".into())]);
}

#[test]
fn uris_round_trip() {
  let registry = Registry::new();
  let plain = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();
  let odd_port = registry.resolve(&Params::sock_addr("192.0.2.1", 61616)).unwrap();
  let secure = registry.resolve(&Params::sock_addr("::1", 5684).security_mode(SecurityMode::PreSharedKey))
                       .unwrap();

  let cases = [(&plain, "coap://[::1]/"),
               (&plain, "coap://[::1]/a/b?x=1&y=2"),
               (&plain, "coap://[::1]:61616/sensors/temp"),
               (&plain, "coap://coap.me/a%2Fb/c%20d?k=a%26b"),
               (&plain, "coap://[2001:db8::1]/x"),
               (&odd_port, "coap://192.0.2.1:61616/hello"),
               (&odd_port, "coap://192.0.2.1/hello"),
               (&odd_port, "coap://192.0.2.2:61616/"),
               (&secure, "coaps://[::1]/secret")];

  for (ep, uri) in cases {
    let opts = uri::to_options(registry.resolver(), ep, uri).unwrap();
    assert_eq!(uri::from_options(ep, &opts).unwrap(), uri, "{:?}", opts);
  }
}

#[test]
fn relative_uris_round_trip_through_the_base_uri() {
  let registry = Registry::new();
  let plain = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();
  let odd_port = registry.resolve(&Params::sock_addr("192.0.2.1", 61616)).unwrap();

  let cases = [(&plain, "/a/b?x=1"),
               (&plain, "a"),
               (&plain, "?q"),
               (&plain, "//other/x"),
               (&plain, "/a//b"),
               (&plain, "/a/"),
               (&odd_port, "hello?k=v&w"),
               (&odd_port, "//192.0.2.1/x")];

  for (ep, uri) in cases {
    let absolute = Url::parse(ep.base_uri()).and_then(|base| base.join(uri))
                                            .unwrap()
                                            .to_string();
    let opts = uri::to_options(registry.resolver(), ep, uri).unwrap();
    assert_eq!(uri::from_options(ep, &opts).unwrap(), absolute, "{:?} -> {:?}", uri, opts);
  }
}

#[test]
fn non_coap_uris_are_rejected() {
  let registry = Registry::new();
  let ep = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();

  assert!(matches!(uri::to_options(registry.resolver(), &ep, "coap://[::1]/a#b"),
                   Err(Error::Uri(UriError::NotAbsolute(_)))));
  assert!(matches!(uri::to_options(registry.resolver(), &ep, "http://[::1]/a"),
                   Err(Error::Uri(UriError::InvalidScheme(_)))));
  assert!(matches!(uri::to_options(registry.resolver(), &ep, "mailto:someone"),
                   Err(Error::Uri(UriError::InvalidScheme(_)))));
}

#[test]
fn wire_options_back_to_a_uri() {
  let registry = Registry::new();
  let ep = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();

  let raw: [(u32, &[u8]); 4] = [(3, b"coap.me"), (11, b"hello"), (12, &[0]), (15, b"a=1")];
  let opts = raw.iter()
                .filter_map(|(n, v)| UriOpt::from_raw(OptNumber(*n), v).transpose())
                .collect::<Result<Vec<_>, _>>()
                .unwrap();

  assert_eq!(uri::from_options(&ep, &opts).unwrap(), "coap://coap.me/hello?a=1");
}

#[test]
fn request_for_uri() {
  let registry = Registry::new();
  let ep = registry.resolve(&Params::sock_addr("192.0.2.1", 5683)).unwrap();

  let params = RequestParams::default().confirmable()
                                       .code(Code::PUT)
                                       .option(OptNumber(12), vec![0])
                                       .payload(b"22.5".to_vec());
  let msg = create_request(registry.resolver(),
                           &MessageBuilder,
                           &ep,
                           "coap://coap.me/temp?unit=c",
                           params).unwrap();

  assert_eq!(msg.ty, Type::Con);
  assert_eq!(msg.code, Code::PUT);
  assert_eq!(msg.opts.get(&UriOpt::HOST),
             Some(&vec![OptValue(b"coap.me".to_vec())]));
  assert_eq!(msg.opts.get(&UriOpt::QUERY),
             Some(&vec![OptValue(b"unit=c".to_vec())]));
  assert_eq!(msg.opts.get(&OptNumber(12)), Some(&vec![OptValue(vec![0])]));
  assert_eq!(msg.payload.0, b"22.5".to_vec());

  let next = create_request(registry.resolver(),
                            &MessageBuilder,
                            &ep,
                            "/",
                            RequestParams::default()).unwrap();
  assert_eq!(next.id.0, msg.id.0.wrapping_add(1));
}
