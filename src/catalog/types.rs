use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifiers come back as strings or numbers depending on the column type.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Lists may come back as `null` instead of being omitted.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /api/edge/channels` payload
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EdgeChannels {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Provider {
    #[serde(default, deserialize_with = "loose_string")]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub channels: Vec<RemoteChannel>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteChannel {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub channel_number: Option<String>,
    /// Older catalogs expose the channel number under this name.
    #[serde(default, deserialize_with = "loose_string")]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Only linear channels carry items.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChannelItem {
    #[serde(default)]
    pub position: Option<Value>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
}

impl ChannelItem {
    /// Position as an integer, if the catalog sent something that reads as one.
    pub fn numeric_position(&self) -> Option<i64> {
        match self.position.as_ref()? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

/// A channel flattened out of its provider, as the resolver sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelDescriptor {
    pub id: Option<String>,
    pub channel_number: Option<String>,
    pub legacy_channel_id: Option<String>,
    pub name: String,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub items: Vec<ChannelItem>,
}

impl EdgeChannels {
    pub fn flatten(self) -> Vec<ChannelDescriptor> {
        self.providers
            .into_iter()
            .flat_map(|provider| {
                let provider_id = provider.provider_id;
                let provider_name = provider.provider_name;
                provider
                    .channels
                    .into_iter()
                    .map(move |ch| ChannelDescriptor {
                        id: ch.id,
                        channel_number: ch.channel_number,
                        legacy_channel_id: ch.channel_id,
                        name: ch.name.unwrap_or_default(),
                        provider_id: provider_id.clone(),
                        provider_name: provider_name.clone(),
                        items: ch.items,
                    })
            })
            .collect()
    }
}

/// Form payload of `POST /admin/channel-items/create`
#[derive(Debug, Clone, PartialEq)]
pub struct NewChannelItem {
    pub channel_id: String,
    pub position: u64,
    /// Always the canonical watch url.
    pub url: String,
    pub duration: u64,
    /// `(form field, value)` of the optional write-time hint.
    pub hint: Option<(String, String)>,
}

pub const ITEM_TYPE_VIDEO: &str = "video";

impl NewChannelItem {
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("channel_id".to_string(), self.channel_id.clone()),
            ("position".to_string(), self.position.to_string()),
            ("type".to_string(), ITEM_TYPE_VIDEO.to_string()),
            ("url".to_string(), self.url.clone()),
            ("duration".to_string(), self.duration.to_string()),
        ];
        if let Some((field, value)) = &self.hint {
            fields.push((field.clone(), value.clone()));
        }
        fields
    }

    /// The item as it will look in the shadow copy once written.
    pub fn to_shadow_item(&self, title: Option<String>, thumbnail: Option<String>) -> ChannelItem {
        ChannelItem {
            position: Some(Value::from(self.position)),
            item_type: Some(ITEM_TYPE_VIDEO.to_string()),
            url: Some(self.url.clone()),
            title,
            thumbnail,
            duration: Some(Value::from(self.duration)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_listing() {
        let payload: EdgeChannels = serde_json::from_value(json!({
            "edge_id": "edge-001",
            "providers": [
                {
                    "provider_id": "prov-nex",
                    "provider_name": "Nex",
                    "channels": [
                        {"id": 7, "channel_number": "003", "name": "News", "kind": "youtube_linear",
                         "items": [{"position": 1, "type": "video", "url": "https://youtu.be/abc", "duration": 60}]},
                        {"id": "8", "channel_id": "004", "name": "Sports", "kind": "hls"}
                    ]
                },
                {"provider_id": 2, "provider_name": "Other"}
            ]
        }))
        .unwrap();

        let channels = payload.flatten();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].id.as_deref(), Some("7"));
        assert_eq!(channels[0].channel_number.as_deref(), Some("003"));
        assert_eq!(channels[0].provider_name.as_deref(), Some("Nex"));
        assert_eq!(channels[0].items.len(), 1);
        assert_eq!(channels[1].legacy_channel_id.as_deref(), Some("004"));
        assert!(channels[1].items.is_empty());
    }

    #[test]
    fn test_flatten_listing_with_null_lists() {
        let payload: EdgeChannels = serde_json::from_str(
            r#"{"providers":[
                {"provider_id":1,"provider_name":"Nex","channels":[{"id":1,"name":"News","items":null}]},
                {"provider_id":2,"provider_name":"Empty","channels":null}
            ]}"#,
        )
        .unwrap();

        let channels = payload.flatten();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "News");
        assert!(channels[0].items.is_empty());

        let empty: EdgeChannels = serde_json::from_str(r#"{"providers":null}"#).unwrap();
        assert!(empty.flatten().is_empty());
    }

    #[test]
    fn test_numeric_position() {
        let item = |v: Value| ChannelItem {
            position: Some(v),
            ..Default::default()
        };
        assert_eq!(item(json!(5)).numeric_position(), Some(5));
        assert_eq!(item(json!(" 12 ")).numeric_position(), Some(12));
        assert_eq!(item(json!(3.0)).numeric_position(), Some(3));
        assert_eq!(item(json!(3.5)).numeric_position(), None);
        assert_eq!(item(json!("bad")).numeric_position(), None);
        assert_eq!(item(json!(null)).numeric_position(), None);
        assert_eq!(ChannelItem::default().numeric_position(), None);
    }

    #[test]
    fn test_form_fields_include_hint_only_when_present() {
        let mut item = NewChannelItem {
            channel_id: "7".into(),
            position: 4,
            url: "https://www.youtube.com/watch?v=abc".into(),
            duration: 90,
            hint: None,
        };
        let fields = item.form_fields();
        assert_eq!(fields.len(), 5);
        assert!(fields.contains(&("type".to_string(), "video".to_string())));

        item.hint = Some(("playlist_id".into(), "12".into()));
        assert!(item
            .form_fields()
            .contains(&("playlist_id".to_string(), "12".to_string())));
    }
}
