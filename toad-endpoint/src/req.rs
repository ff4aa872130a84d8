//! Creating requests addressed by URI

use toad_msg::{Code, Id, OptNumber, OptValue, Payload, Token, Type};

use crate::error::Error;
use crate::resolve::Resolve;
use crate::{logging, uri, Endpoint};

/// Something that can assemble a CoAP request.
///
/// [`create_request`] works out every field of the request;
/// implementors only put them together.
pub trait BuildRequest {
  /// The request type built
  type Request;

  /// Build a request.
  ///
  /// `options` are in the order they should be sent
  /// (URI options first, then any extra options).
  fn build_request(&self,
                   confirmable: bool,
                   code: Code,
                   id: Id,
                   token: Token,
                   options: Vec<(OptNumber, Vec<u8>)>,
                   payload: Option<Vec<u8>>)
                   -> Self::Request;
}

/// [`BuildRequest`] that builds [`toad_msg::alloc::Message`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageBuilder;

impl BuildRequest for MessageBuilder {
  type Request = toad_msg::alloc::Message;

  fn build_request(&self,
                   confirmable: bool,
                   code: Code,
                   id: Id,
                   token: Token,
                   options: Vec<(OptNumber, Vec<u8>)>,
                   payload: Option<Vec<u8>>)
                   -> Self::Request {
    let ty = if confirmable { Type::Con } else { Type::Non };
    let mut msg = toad_msg::alloc::Message::new(ty, code, id, token);

    options.into_iter().for_each(|(number, value)| {
                         msg.opts.entry(number).or_default().push(OptValue(value))
                       });
    msg.payload = Payload(payload.unwrap_or_default());

    msg
  }
}

/// Everything about a request other than its URI
///
/// ```
/// use toad_endpoint::req::RequestParams;
/// use toad_msg::{Code, Id};
///
/// let params = RequestParams::default().confirmable()
///                                      .code(Code::POST)
///                                      .id(Id(1))
///                                      .payload(b"hi".to_vec());
/// assert!(params.confirmable);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
  /// Send as a confirmable message? (default: no)
  pub confirmable: bool,
  /// Request code (default: GET)
  pub code: Code,
  /// Message ID (default: the endpoint's next message ID)
  pub id: Option<Id>,
  /// Token (default: empty)
  pub token: Token,
  /// Options appended after the URI options
  pub options: Vec<(OptNumber, Vec<u8>)>,
  /// Payload (default: none)
  pub payload: Option<Vec<u8>>,
}

impl Default for RequestParams {
  fn default() -> Self {
    RequestParams { confirmable: false,
                    code: Code::GET,
                    id: None,
                    token: Token(Default::default()),
                    options: vec![],
                    payload: None }
  }
}

impl RequestParams {
  /// Send as a confirmable message
  pub fn confirmable(mut self) -> Self {
    self.confirmable = true;
    self
  }

  /// Set the request code
  pub fn code(mut self, code: Code) -> Self {
    self.code = code;
    self
  }

  /// Use a specific message ID instead of the endpoint's next one
  pub fn id(mut self, id: Id) -> Self {
    self.id = Some(id);
    self
  }

  /// Set the token
  pub fn token(mut self, token: Token) -> Self {
    self.token = token;
    self
  }

  /// Append an option after the URI options
  pub fn option(mut self, number: OptNumber, value: Vec<u8>) -> Self {
    self.options.push((number, value));
    self
  }

  /// Set the payload
  pub fn payload(mut self, payload: Vec<u8>) -> Self {
    self.payload = Some(payload);
    self
  }
}

/// Create a request for `uri` (resolved against `ep`'s base URI) to be sent to `ep`.
///
/// The endpoint's next message ID is only consumed when `params` has no ID
/// and `uri` translated successfully.
///
/// ```
/// use toad_endpoint::req::{create_request, MessageBuilder, RequestParams};
/// use toad_endpoint::{Params, Registry};
/// use toad_msg::{OptNumber, OptValue, Type};
///
/// let registry = Registry::new();
/// let ep = registry.resolve(&Params::sock_addr("::1", 5683)).unwrap();
///
/// let msg = create_request(registry.resolver(),
///                          &MessageBuilder,
///                          &ep,
///                          "/temp",
///                          RequestParams::default().confirmable()).unwrap();
///
/// assert_eq!(msg.ty, Type::Con);
/// assert_eq!(msg.opts.get(&OptNumber(11)), Some(&vec![OptValue(b"temp".to_vec())]));
/// ```
///
/// # Errors
/// See [`uri::to_options`].
pub fn create_request<R, B>(resolver: &R,
                            builder: &B,
                            ep: &Endpoint,
                            uri: &str,
                            params: RequestParams)
                            -> Result<B::Request, Error>
  where R: Resolve,
        B: BuildRequest
{
  let uri_opts = uri::to_options(resolver, ep, uri)?;
  log::trace!("{} -> {}", uri, logging::opts_summary(&uri_opts));

  let RequestParams { confirmable,
                      code,
                      id,
                      token,
                      options: extra,
                      payload, } = params;

  let options = uri_opts.iter()
                        .map(|o| (o.number(), o.value_bytes()))
                        .chain(extra)
                        .collect::<Vec<_>>();

  let id = id.unwrap_or_else(|| ep.next_message_id());

  Ok(builder.build_request(confirmable, code, id, token, options, payload))
}
