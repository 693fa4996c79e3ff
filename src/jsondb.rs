//! # JSON Database Reader
//!
//! Reads the platform's JSON database folder into a [`RecordSet`]. Each file is one object
//! mapping record names to records, optionally wrapped as `{"class": ..., "value": {...}}`:
//!
//! ```json
//! {
//!   "acme:switch:dev1": {
//!     "class": "org.openhab.core.thing.dto.ThingDTO",
//!     "value": { "UID": "acme:switch:dev1", "label": "Lamp", "isBridge": false }
//!   }
//! }
//! ```
//!
//! Key order is preserved so that records and configuration values keep their source order.
//! A missing file is an empty category.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::record::{
    AnnotationRecord, DeviceRecord, EndpointRecord, LinkRecord, RawProperty, VariableRecord,
};
use crate::{ExportError, RecordSet, ValueType};

/// Device and container records.
pub const DEVICES_FILE: &str = "org.openhab.core.thing.Thing.json";
/// Variable records.
pub const VARIABLES_FILE: &str = "org.openhab.core.items.Item.json";
/// Link records.
pub const LINKS_FILE: &str = "org.openhab.core.thing.link.ItemChannelLink.json";
/// Annotation records.
pub const ANNOTATIONS_FILE: &str = "org.openhab.core.items.Metadata.json";

//////////////////////////////////////////// JSON shapes ///////////////////////////////////////////

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Uid {
    Text(String),
    Segments { segments: Vec<String> },
}

impl Uid {
    fn into_string(self) -> String {
        match self {
            Uid::Text(text) => text,
            Uid::Segments { segments } => segments.join(":"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThingJson {
    #[serde(rename = "UID", alias = "uid")]
    uid: Option<Uid>,
    #[serde(rename = "bridgeUID", alias = "BridgeUID")]
    bridge_uid: Option<Uid>,
    #[serde(rename = "isBridge", alias = "isContainer", default)]
    is_bridge: Option<bool>,
    label: Option<String>,
    location: Option<String>,
    configuration: Option<Value>,
    channels: Option<Vec<ChannelJson>>,
}

#[derive(Debug, Deserialize)]
struct ChannelJson {
    #[serde(alias = "UID")]
    uid: Option<Uid>,
    id: Option<String>,
    kind: Option<String>,
    #[serde(rename = "itemType", alias = "acceptedItemType")]
    item_type: Option<String>,
    #[serde(rename = "channelTypeUID")]
    channel_type_uid: Option<Uid>,
    label: Option<String>,
    configuration: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ItemJson {
    name: Option<String>,
    #[serde(rename = "itemType")]
    item_type: Option<String>,
    label: Option<String>,
    category: Option<String>,
    #[serde(rename = "iconName")]
    icon_name: Option<String>,
    #[serde(rename = "groupNames")]
    group_names: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    #[serde(rename = "baseItemType")]
    base_item_type: Option<String>,
    #[serde(rename = "functionName")]
    function_name: Option<String>,
    #[serde(rename = "functionParams")]
    function_params: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct LinkJson {
    #[serde(rename = "itemName")]
    item_name: Option<String>,
    #[serde(rename = "channelUID", alias = "uid", alias = "UID")]
    channel_uid: Option<Uid>,
    configuration: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MetadataJson {
    value: Option<String>,
    configuration: Option<Value>,
}

/////////////////////////////////////////// Configuration //////////////////////////////////////////

fn scalar_property(name: &str, value: &Value) -> Option<RawProperty> {
    match value {
        Value::Bool(b) => Some(RawProperty::typed(ValueType::Bool, name, b.to_string())),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            Some(RawProperty::typed(ValueType::Int, name, n.to_string()))
        }
        Value::Number(n) => n
            .as_f64()
            .map(|f| RawProperty::typed(ValueType::Decimal, name, format!("{}", f))),
        Value::String(s) => Some(RawProperty::typed(ValueType::String, name, s.as_str())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn to_raw_property(record: &str, name: &str, value: &Value) -> Result<Option<RawProperty>, ExportError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => {
            warn!("{}: skipping nested configuration object '{}'", record, name);
            Ok(None)
        }
        Value::Array(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                match scalar_property(name, item) {
                    Some(property) => rendered.push(
                        property
                            .to_typed_value(false)
                            .map_err(|e| e.in_record(record))?
                            .render(),
                    ),
                    None => warn!("{}: skipping non-scalar element of '{}'", record, name),
                }
            }
            if rendered.is_empty() {
                return Ok(None);
            }
            Ok(Some(RawProperty::typed(
                ValueType::Other,
                name,
                rendered.join(", "),
            )))
        }
        scalar => Ok(scalar_property(name, scalar)),
    }
}

/// Converts a configuration map into raw properties, keeping key order.
///
/// Accepts both a bare map and one wrapped as `{"properties": {...}}`.
pub fn configuration_properties(
    record: &str,
    configuration: Option<&Value>,
) -> Result<Vec<RawProperty>, ExportError> {
    let Some(Value::Object(map)) = configuration else {
        return Ok(Vec::new());
    };
    let map = match map.get("properties") {
        Some(Value::Object(inner)) if map.len() == 1 => inner,
        _ => map,
    };
    let mut properties = Vec::with_capacity(map.len());
    for (name, value) in map {
        if let Some(property) = to_raw_property(record, name, value)? {
            properties.push(property);
        }
    }
    Ok(properties)
}

////////////////////////////////////////////// Records /////////////////////////////////////////////

fn parse_entries<T: DeserializeOwned>(
    json: &str,
    source: &str,
) -> Result<Vec<(String, T)>, ExportError> {
    let json = json.trim_start_matches('\u{feff}');
    let map: Map<String, Value> =
        serde_json::from_str(json).map_err(|e| ExportError::json(source, e))?;
    let mut entries = Vec::with_capacity(map.len());
    for (name, value) in map {
        let value = match value {
            Value::Object(mut wrapper) if wrapper.contains_key("class") => {
                wrapper.remove("value").unwrap_or(Value::Null)
            }
            other => other,
        };
        let record = serde_json::from_value(value)
            .map_err(|e| ExportError::json(format!("{} / {}", source, name), e))?;
        entries.push((name, record));
    }
    Ok(entries)
}

fn endpoint_record(
    device_uid: &str,
    record: &str,
    channel: ChannelJson,
) -> Result<EndpointRecord, ExportError> {
    let uid = match (channel.uid, channel.id) {
        (Some(uid), _) => uid.into_string(),
        (None, Some(id)) => format!("{}:{}", device_uid, id),
        (None, None) => {
            return Err(ExportError::Json {
                path: record.to_string(),
                message: "channel has neither uid nor id".to_string(),
            });
        }
    };
    let configuration = configuration_properties(record, channel.configuration.as_ref())?;
    Ok(EndpointRecord {
        uid,
        kind: channel.kind.unwrap_or_else(|| "STATE".to_string()),
        data_type: channel.item_type,
        endpoint_type_uid: channel.channel_type_uid.map(Uid::into_string),
        label: channel.label,
        configuration,
    })
}

/// Parses the device file's contents.
pub fn parse_devices(json: &str, source: &str) -> Result<Vec<DeviceRecord>, ExportError> {
    let mut records = Vec::new();
    for (name, thing) in parse_entries::<ThingJson>(json, source)? {
        let uid = thing
            .uid
            .map(Uid::into_string)
            .unwrap_or_else(|| name.clone());
        let endpoints = thing
            .channels
            .unwrap_or_default()
            .into_iter()
            .map(|channel| endpoint_record(&uid, &name, channel))
            .collect::<Result<Vec<_>, _>>()?;
        records.push(DeviceRecord {
            configuration: configuration_properties(&name, thing.configuration.as_ref())?,
            uid,
            container_uid: thing.bridge_uid.map(Uid::into_string),
            is_container: thing.is_bridge.unwrap_or(false),
            label: thing.label,
            location: thing.location,
            endpoints,
            name,
        });
    }
    Ok(records)
}

/// Parses the variable file's contents.
pub fn parse_variables(json: &str, source: &str) -> Result<Vec<VariableRecord>, ExportError> {
    Ok(parse_entries::<ItemJson>(json, source)?
        .into_iter()
        .map(|(key, item)| VariableRecord {
            name: item.name.unwrap_or(key),
            data_type: item.item_type.unwrap_or_default(),
            label: item.label,
            category: item.category,
            icon_name: item.icon_name,
            groups: item.group_names.unwrap_or_default(),
            tags: item.tags.unwrap_or_default(),
            base_type: item.base_item_type,
            function_name: item.function_name,
            function_params: item.function_params.unwrap_or_default(),
        })
        .collect())
}

/// Parses the link file's contents.
pub fn parse_links(json: &str, source: &str) -> Result<Vec<LinkRecord>, ExportError> {
    let mut records = Vec::new();
    for (name, link) in parse_entries::<LinkJson>(json, source)? {
        let endpoint_uid = match link.channel_uid {
            Some(uid) => uid.into_string(),
            None => match name.split_once(" -> ") {
                Some((_, endpoint)) => endpoint.trim().to_string(),
                None => {
                    return Err(ExportError::Json {
                        path: format!("{} / {}", source, name),
                        message: "link has no channel uid".to_string(),
                    });
                }
            },
        };
        records.push(LinkRecord {
            configuration: configuration_properties(&name, link.configuration.as_ref())?,
            variable_name: link.item_name,
            endpoint_uid,
            name,
        });
    }
    Ok(records)
}

/// Parses the annotation file's contents.
pub fn parse_annotations(json: &str, source: &str) -> Result<Vec<AnnotationRecord>, ExportError> {
    let mut records = Vec::new();
    for (name, metadata) in parse_entries::<MetadataJson>(json, source)? {
        records.push(AnnotationRecord {
            configuration: configuration_properties(&name, metadata.configuration.as_ref())?,
            value: metadata.value.unwrap_or_default(),
            name,
        });
    }
    Ok(records)
}

fn read_optional(dir: &Path, file: &str) -> Result<Option<(String, String)>, ExportError> {
    let path = dir.join(file);
    if !path.exists() {
        info!("{} not found; treating as empty", path.display());
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| ExportError::io(&path, e))?;
    Ok(Some((content, path.display().to_string())))
}

/// Reads every category from the database folder `dir`.
pub fn read_folder(dir: &Path) -> Result<RecordSet, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::Io {
            path: dir.display().to_string(),
            message: "not a directory".to_string(),
        });
    }
    let mut records = RecordSet::default();
    if let Some((json, source)) = read_optional(dir, DEVICES_FILE)? {
        records.devices = parse_devices(&json, &source)?;
    }
    if let Some((json, source)) = read_optional(dir, VARIABLES_FILE)? {
        records.variables = parse_variables(&json, &source)?;
    }
    if let Some((json, source)) = read_optional(dir, LINKS_FILE)? {
        records.links = parse_links(&json, &source)?;
    }
    if let Some((json, source)) = read_optional(dir, ANNOTATIONS_FILE)? {
        records.annotations = parse_annotations(&json, &source)?;
    }
    info!(
        "read {} device, {} variable, {} link and {} annotation records from {}",
        records.devices.len(),
        records.variables.len(),
        records.links.len(),
        records.annotations.len(),
        dir.display()
    );
    Ok(records)
}
