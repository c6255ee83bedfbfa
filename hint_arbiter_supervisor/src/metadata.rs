use hint_arbiter_core::{EncodeMetadata, MetadataError, MetadataParser, ProfileId};

/// Parses encoder metadata of the form `state=1:hint_id=0x0A00`.
///
/// Fields are `:`-separated `key=value` pairs. `state` is decimal,
/// `hint_id` decimal or `0x` hex. Unknown keys are skipped; missing keys keep
/// the `EncodeMetadata` defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyValueMetadataParser;

impl MetadataParser for KeyValueMetadataParser {
    fn parse(&self, raw: &str) -> Result<EncodeMetadata, MetadataError> {
        let mut md = EncodeMetadata::default();
        for field in raw.split(':').map(str::trim).filter(|f| !f.is_empty()) {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| MetadataError::MalformedField(field.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            let bad = || MetadataError::BadValue {
                key: key.to_string(),
                value: value.to_string(),
            };
            match key {
                "state" => md.state = value.parse().map_err(|_| bad())?,
                "hint_id" => md.hint_id = ProfileId(parse_u32(value).ok_or_else(bad)?),
                _ => {}
            }
        }
        Ok(md)
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
