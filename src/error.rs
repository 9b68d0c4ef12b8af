/// Result type alias for cursor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for keyset cursor generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from the token codec (malformed token, custom layer failure).
   #[error(transparent)]
   Codec(#[from] keyset_cursor_codec::Error),

   /// A sort key has an empty name.
   #[error("cursor key names must not be empty")]
   EmptyKeyName,

   /// Two sort keys share a name, which would make the predicate ambiguous.
   #[error("cursor key '{key}' is configured more than once")]
   DuplicateCursorKey { key: String },

   /// The previous row has no value for a configured sort key.
   #[error("previous row has no value for cursor key '{key}'")]
   CursorValueNotFound { key: String },

   /// Column name contains characters that cannot be safely rendered into SQL.
   ///
   /// Column names must match `[a-zA-Z_][a-zA-Z0-9_.]*` (letters, digits,
   /// underscores, and dots for qualified names like `table.column`).
   #[error("invalid column name '{name}': must match [a-zA-Z_][a-zA-Z0-9_.]*")]
   InvalidColumnName { name: String },
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// Codec errors keep the codec's own code.
   pub fn error_code(&self) -> String {
      match self {
         Error::Codec(e) => e.error_code(),
         Error::EmptyKeyName => "EMPTY_KEY_NAME".to_string(),
         Error::DuplicateCursorKey { .. } => "DUPLICATE_CURSOR_KEY".to_string(),
         Error::CursorValueNotFound { .. } => "CURSOR_VALUE_NOT_FOUND".to_string(),
         Error::InvalidColumnName { .. } => "INVALID_COLUMN_NAME".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_codec_passthrough() {
      let err = Error::from(keyset_cursor_codec::Error::DateOutOfRange);
      assert_eq!(err.error_code(), "DATE_OUT_OF_RANGE");
      assert!(err.to_string().contains("outside the representable range"));
   }

   #[test]
   fn test_error_code_empty_key_name() {
      assert_eq!(Error::EmptyKeyName.error_code(), "EMPTY_KEY_NAME");
   }

   #[test]
   fn test_error_code_duplicate_cursor_key() {
      let err = Error::DuplicateCursorKey { key: "id".into() };
      assert_eq!(err.error_code(), "DUPLICATE_CURSOR_KEY");
      assert!(err.to_string().contains("'id'"));
   }

   #[test]
   fn test_error_code_cursor_value_not_found() {
      let err = Error::CursorValueNotFound {
         key: "score".into(),
      };
      assert_eq!(err.error_code(), "CURSOR_VALUE_NOT_FOUND");
      assert!(err.to_string().contains("score"));
   }

   #[test]
   fn test_error_code_invalid_column_name() {
      let err = Error::InvalidColumnName {
         name: "bad;name".into(),
      };
      assert_eq!(err.error_code(), "INVALID_COLUMN_NAME");
      assert!(err.to_string().contains("bad;name"));
   }
}
