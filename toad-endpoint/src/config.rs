use crate::{COAPS_PORT, COAP_PORT};

/// Runtime config for a [`Registry`](crate::Registry)
///
/// ```
/// use toad_endpoint::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.coap_port, 5683);
/// assert_eq!(config.coaps_port, 5684);
/// assert_eq!(config.message_id_seed, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
  /// Default port for the `coap` scheme.
  ///
  /// URIs whose port is this port omit it, and
  /// URIs that omit their port use it.
  pub coap_port: u16,
  /// Default port for the `coaps` scheme.
  pub coaps_port: u16,
  /// Seed for the generator that picks each endpoint's
  /// initial message ID.
  ///
  /// When `None`, the generator is seeded from system entropy.
  /// Set this to get deterministic message IDs (e.g. in tests).
  pub message_id_seed: Option<u64>,
}

impl Config {
  /// The default port for a scheme, depending on whether it is secure
  pub fn default_port(&self, secure: bool) -> u16 {
    if secure {
      self.coaps_port
    } else {
      self.coap_port
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Config { coap_port: COAP_PORT,
             coaps_port: COAPS_PORT,
             message_id_seed: None }
  }
}
