use core::fmt::Write;

use crate::text::to_display_text;
use crate::{Endpoint, UriOpt};

pub(crate) fn endpoint_summary(ep: &Endpoint) -> String {
  let mut buf = String::new();
  write!(buf,
         "{} ({:?}, {})",
         ep.base_uri(),
         ep.family(),
         ep.security_mode()
           .map(|m| format!("{:?}", m))
           .unwrap_or_else(|| "NoSec".to_string())).ok();
  buf
}

pub(crate) fn opts_summary(opts: &[UriOpt]) -> String {
  let mut buf = String::new();
  opts.iter().for_each(|o| {
               if !buf.is_empty() {
                 buf.push(' ');
               }
               write!(buf, "{}={}", o.number().0, to_display_text(&o.value_bytes())).ok();
             });
  buf
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test::ResolverMock;
  use crate::{Params, Registry, SecurityMode};

  #[test]
  fn summaries() {
    let reg = Registry::with_resolver(ResolverMock::new());
    let ep = reg.resolve(&Params::sock_addr("::1", 5683).security_mode(SecurityMode::Certificate))
                .unwrap();
    assert_eq!(endpoint_summary(&ep), "coaps://[::1]:5683/ (Ipv6, Certificate)");

    let opts = [UriOpt::Port(Some(5683)), UriOpt::Path("a".into())];
    assert_eq!(opts_summary(&opts), "7=[1633] 11=a");
  }
}
