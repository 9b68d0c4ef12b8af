//! Error types for keyset-cursor-codec

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning rows into tokens and back.
///
/// Malformed tokens always surface here; the codec never returns partial data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Token is not valid base64 for the configured alphabet.
   #[error("invalid base64 token: {0}")]
   Base64(#[from] base64::DecodeError),

   /// Decoded token bytes are not UTF-8 text.
   #[error("decoded token is not valid UTF-8: {0}")]
   Utf8(#[from] std::string::FromUtf8Error),

   /// Token text is not a JSON object, or a record could not be written as JSON.
   #[error("invalid token payload: {0}")]
   Json(#[from] serde_json::Error),

   /// A date-time value could not be written in the canonical format.
   #[error("failed to format date-time: {0}")]
   Format(#[from] time::error::Format),

   /// A date-time value cannot be expressed in UTC.
   #[error("date-time value is outside the representable range")]
   DateOutOfRange,

   /// Failure reported by a custom transport layer.
   #[error("transport layer failed: {0}")]
   Transport(String),

   /// Failure reported by a custom serializer layer.
   #[error("serializer layer failed: {0}")]
   Serializer(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Base64(_) => "INVALID_TOKEN_ENCODING".to_string(),
         Error::Utf8(_) => "INVALID_TOKEN_TEXT".to_string(),
         Error::Json(_) => "INVALID_TOKEN_PAYLOAD".to_string(),
         Error::Format(_) => "DATE_FORMAT_ERROR".to_string(),
         Error::DateOutOfRange => "DATE_OUT_OF_RANGE".to_string(),
         Error::Transport(_) => "TRANSPORT_ERROR".to_string(),
         Error::Serializer(_) => "SERIALIZER_ERROR".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_json() {
      let err = Error::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
      assert_eq!(err.error_code(), "INVALID_TOKEN_PAYLOAD");
      assert!(err.to_string().starts_with("invalid token payload"));
   }

   #[test]
   fn test_error_code_date_out_of_range() {
      assert_eq!(Error::DateOutOfRange.error_code(), "DATE_OUT_OF_RANGE");
   }

   #[test]
   fn test_error_code_transport() {
      let err = Error::Transport("missing prefix".into());
      assert_eq!(err.error_code(), "TRANSPORT_ERROR");
      assert!(err.to_string().contains("missing prefix"));
   }

   #[test]
   fn test_error_code_serializer() {
      let err = Error::Serializer("bad envelope".into());
      assert_eq!(err.error_code(), "SERIALIZER_ERROR");
      assert!(err.to_string().contains("bad envelope"));
   }
}
