//! Transport layer: serialized text ⇄ opaque token string.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

use crate::Result;

/// Binary-safe outer encoding of a cursor token.
///
/// Implementations must round-trip arbitrary Unicode text exactly. Custom transports
/// (encryption, alternative alphabets, prefixes) report failures as
/// [`Error::Transport`](crate::Error::Transport).
pub trait Transport: Send + Sync {
   /// Turn serialized text into a token.
   fn encode(&self, text: &str) -> Result<String>;

   /// Turn a token back into serialized text.
   fn decode(&self, token: &str) -> Result<String>;
}

/// Standard-alphabet, padded base64 over the UTF-8 bytes of the text.
///
/// This is the default and produces tokens such as `eyJpZCI6MX0=`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Transport;

impl Transport for Base64Transport {
   fn encode(&self, text: &str) -> Result<String> {
      Ok(STANDARD.encode(text.as_bytes()))
   }

   fn decode(&self, token: &str) -> Result<String> {
      Ok(String::from_utf8(STANDARD.decode(token)?)?)
   }
}

/// URL-safe alphabet (`-`, `_`) without padding, for tokens embedded in paths or query
/// strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64UrlTransport;

impl Transport for Base64UrlTransport {
   fn encode(&self, text: &str) -> Result<String> {
      Ok(URL_SAFE_NO_PAD.encode(text.as_bytes()))
   }

   fn decode(&self, token: &str) -> Result<String> {
      Ok(String::from_utf8(URL_SAFE_NO_PAD.decode(token)?)?)
   }
}

/// Transport built from a pair of closures.
pub struct FnTransport<E, D> {
   encode: E,
   decode: D,
}

impl<E, D> FnTransport<E, D>
where
   E: Fn(&str) -> Result<String> + Send + Sync,
   D: Fn(&str) -> Result<String> + Send + Sync,
{
   pub fn new(encode: E, decode: D) -> Self {
      Self { encode, decode }
   }
}

impl<E, D> fmt::Debug for FnTransport<E, D> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("FnTransport")
   }
}

impl<E, D> Transport for FnTransport<E, D>
where
   E: Fn(&str) -> Result<String> + Send + Sync,
   D: Fn(&str) -> Result<String> + Send + Sync,
{
   fn encode(&self, text: &str) -> Result<String> {
      (self.encode)(text)
   }

   fn decode(&self, token: &str) -> Result<String> {
      (self.decode)(token)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::Error;

   const JAPANESE: &str = "hey, こんにちは世界";

   #[test]
   fn base64_encodes_ascii() {
      assert_eq!(
         Base64Transport.encode("hello world").unwrap(),
         "aGVsbG8gd29ybGQ="
      );
      assert_eq!(
         Base64Transport.decode("aGVsbG8gd29ybGQ=").unwrap(),
         "hello world"
      );
   }

   #[test]
   fn base64_round_trips_multibyte_text() {
      assert_eq!(
         Base64Transport.encode(JAPANESE).unwrap(),
         "aGV5LCDjgZPjgpPjgavjgaHjga/kuJbnlYw="
      );
      assert_eq!(
         Base64Transport
            .decode("aGV5LCDjgZPjgpPjgavjgaHjga/kuJbnlYw=")
            .unwrap(),
         JAPANESE
      );
   }

   #[test]
   fn base64_url_avoids_reserved_characters() {
      let token = Base64UrlTransport.encode(JAPANESE).unwrap();
      assert_eq!(token, "aGV5LCDjgZPjgpPjgavjgaHjga_kuJbnlYw");
      assert_eq!(Base64UrlTransport.decode(&token).unwrap(), JAPANESE);
   }

   #[test]
   fn base64_rejects_garbage() {
      let err = Base64Transport.decode("not base64!").unwrap_err();
      assert!(matches!(err, Error::Base64(_)));
   }

   #[test]
   fn base64_rejects_non_utf8_payload() {
      // 0xFF 0xFE is not valid UTF-8
      let err = Base64Transport.decode("//4=").unwrap_err();
      assert!(matches!(err, Error::Utf8(_)));
   }

   #[test]
   fn fn_transport_delegates_to_closures() {
      let transport = FnTransport::new(
         |text: &str| Ok(format!("cur_{text}")),
         |token: &str| {
            token
               .strip_prefix("cur_")
               .map(str::to_string)
               .ok_or_else(|| Error::Transport("missing prefix".into()))
         },
      );

      assert_eq!(transport.encode("abc").unwrap(), "cur_abc");
      assert_eq!(transport.decode("cur_abc").unwrap(), "abc");
      assert!(matches!(
         transport.decode("abc"),
         Err(Error::Transport(_))
      ));
   }
}
