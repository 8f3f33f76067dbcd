use std::path::Path;

use serde_json::Value;

use super::lenient::strip_trailing_commas;
use crate::errors::IngestError;

const BOM: char = '\u{feff}';

/// One channel's worth of work from the batch file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBatch {
    pub name: String,
    pub urls: Vec<String>,
}

/// `{"channels":[{"name":..,"urls":[..]}, ..]}` in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSpec {
    pub channels: Vec<ChannelBatch>,
}

impl BatchSpec {
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Lenient parse: a leading BOM and trailing commas are tolerated.
    pub fn parse(raw: &str) -> Result<Self, IngestError> {
        let raw = raw.strip_prefix(BOM).unwrap_or(raw);
        let value: Value = serde_json::from_str(&strip_trailing_commas(raw))?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Result<Self, IngestError> {
        let entries = value
            .as_object()
            .ok_or_else(|| IngestError::Validation("top level must be an object".to_string()))?
            .get("channels")
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::Validation("'channels' must be an array".to_string()))?;

        let channels = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| parse_entry(idx + 1, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BatchSpec { channels })
    }
}

fn parse_entry(index: usize, entry: &Value) -> Result<ChannelBatch, IngestError> {
    let invalid = |msg: &str| IngestError::Validation(format!("channels[{index}]: {msg}"));

    let obj = entry
        .as_object()
        .ok_or_else(|| invalid("entry must be an object"))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| invalid("missing 'name'"))?;

    let urls = match obj.get("urls") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|u| {
                u.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("'urls' must contain only strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid("'urls' must be an array")),
    };

    Ok(ChannelBatch {
        name: name.to_string(),
        urls,
    })
}
