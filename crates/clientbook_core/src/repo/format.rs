//! Flat-file record codecs.
//!
//! # Invariants
//! - A file is a single top-level sequence of records.
//! - Blank input decodes to an empty sequence.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum FormatError {
    Decode {
        format: &'static str,
        message: String,
    },
    Encode {
        format: &'static str,
        message: String,
    },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { format, message } => write!(f, "failed to decode {format}: {message}"),
            Self::Encode { format, message } => write!(f, "failed to encode {format}: {message}"),
        }
    }
}

impl Error for FormatError {}

/// Serialization format for a file-backed record list.
pub trait RecordFormat {
    /// Short lowercase name used in logs and errors.
    const NAME: &'static str;

    fn decode<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, FormatError>;
    fn encode<T: Serialize>(records: &[T]) -> Result<String, FormatError>;
}

/// Four-space indented JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl RecordFormat for JsonFormat {
    const NAME: &'static str = "json";

    fn decode<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, FormatError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(text).map_err(|err| FormatError::Decode {
            format: Self::NAME,
            message: err.to_string(),
        })
    }

    fn encode<T: Serialize>(records: &[T]) -> Result<String, FormatError> {
        let encode_error = |message: String| FormatError::Encode {
            format: Self::NAME,
            message,
        };

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records
            .serialize(&mut serializer)
            .map_err(|err| encode_error(err.to_string()))?;

        let mut text = String::from_utf8(buffer).map_err(|err| encode_error(err.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

/// Block-style YAML sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl RecordFormat for YamlFormat {
    const NAME: &'static str = "yaml";

    fn decode<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, FormatError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        // `~` / `null` documents are treated like an empty file.
        let records: Option<Vec<T>> =
            serde_yaml::from_str(text).map_err(|err| FormatError::Decode {
                format: Self::NAME,
                message: err.to_string(),
            })?;
        Ok(records.unwrap_or_default())
    }

    fn encode<T: Serialize>(records: &[T]) -> Result<String, FormatError> {
        serde_yaml::to_string(records).map_err(|err| FormatError::Encode {
            format: Self::NAME,
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFormat, RecordFormat, YamlFormat};
    use std::collections::BTreeMap;

    type Row = BTreeMap<String, String>;

    #[test]
    fn blank_and_null_inputs_decode_to_empty() {
        assert!(JsonFormat::decode::<Row>("  \n").unwrap().is_empty());
        assert!(YamlFormat::decode::<Row>("").unwrap().is_empty());
        assert!(YamlFormat::decode::<Row>("~\n").unwrap().is_empty());
    }

    #[test]
    fn json_output_uses_four_space_indent_and_keeps_unicode() {
        let mut row = Row::new();
        row.insert("LastName".to_string(), "Иванов".to_string());
        let text = JsonFormat::encode(&[row]).unwrap();
        assert!(text.contains("\n    {"));
        assert!(text.contains("Иванов"));
    }

    #[test]
    fn malformed_input_reports_format_name() {
        let err = JsonFormat::decode::<Row>("{not json").unwrap_err();
        assert!(err.to_string().contains("json"));
        let err = YamlFormat::decode::<Row>("- [unclosed").unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }
}
