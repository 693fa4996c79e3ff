use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use jsondb_export::jsondb::{ANNOTATIONS_FILE, DEVICES_FILE, LINKS_FILE, VARIABLES_FILE};
use jsondb_export::output::export_folder;
use jsondb_export::{ExportConfig, ExportError, RenderOptions};

const THINGS: &str = r#"{
  "astro:sun:home": {
    "class": "org.openhab.core.thing.dto.ThingDTO",
    "value": {
      "label": "Sun",
      "UID": "astro:sun:home",
      "configuration": { "interval": 300 },
      "channels": [
        { "uid": "astro:sun:home:rise#event", "kind": "TRIGGER", "channelTypeUID": "astro:rise-event" }
      ]
    }
  },
  "mqtt:topic:home:lamp": {
    "class": "org.openhab.core.thing.dto.ThingDTO",
    "value": {
      "label": "Lamp",
      "location": "Kitchen",
      "UID": "mqtt:topic:home:lamp",
      "bridgeUID": "mqtt:broker:home",
      "configuration": {},
      "channels": [
        {
          "uid": "mqtt:topic:home:lamp:power",
          "kind": "STATE",
          "itemType": "Switch",
          "label": "Power",
          "configuration": { "commandTopic": "lamp/set" }
        },
        { "uid": "mqtt:topic:home:lamp:brightness", "kind": "STATE", "itemType": "Dimmer" }
      ]
    }
  },
  "mqtt:broker:home": {
    "class": "org.openhab.core.thing.dto.ThingDTO",
    "value": {
      "label": "Broker",
      "UID": "mqtt:broker:home",
      "isBridge": true,
      "configuration": { "properties": { "host": "10.0.0.2", "port": 1883 } }
    }
  }
}"#;

const ITEMS: &str = r#"{
  "Light1": {
    "class": "org.openhab.core.items.ManagedItemProvider$PersistedItem",
    "value": {
      "groupNames": ["gLiving"],
      "itemType": "Switch",
      "tags": ["Lighting"],
      "label": "Living Room Light",
      "category": "light"
    }
  },
  "Temp": {
    "class": "org.openhab.core.items.ManagedItemProvider$PersistedItem",
    "value": { "itemType": "Number:Temperature", "label": "Temperature °C" }
  },
  "gLiving": {
    "class": "org.openhab.core.items.ManagedItemProvider$PersistedItem",
    "value": { "itemType": "Group", "label": "Living Room" }
  }
}"#;

const LINKS: &str = r#"{
  "Light1 -> mqtt:topic:home:lamp:power": {
    "class": "org.openhab.core.thing.link.ItemChannelLink",
    "value": {
      "channelUID": { "segments": ["mqtt", "topic", "home", "lamp", "power"] },
      "configuration": { "properties": {} },
      "itemName": "Light1"
    }
  },
  "Temp -> astro:sun:home:temp": {
    "class": "org.openhab.core.thing.link.ItemChannelLink",
    "value": {
      "channelUID": "astro:sun:home:temp",
      "configuration": { "properties": { "profile": "system:offset", "offset": 0.5 } },
      "itemName": "Temp"
    }
  }
}"#;

const METADATA: &str = r#"{
  "stateDescription:Temp": {
    "class": "org.openhab.core.items.Metadata",
    "value": { "value": " ", "configuration": { "readOnly": true } }
  }
}"#;

const EXPECTED_THINGS: &str = "Container mqtt:broker:home \"Broker\" [\r\n\
  \x20 host=\"10.0.0.2\",\r\n\
  \x20 port=1883\r\n\
  ] {\r\n\
  \x20 Device topic lamp \"Lamp\" @ \"Kitchen\" {\r\n\
  \x20   Endpoints:\r\n\
  \x20     State Switch : power \"Power\" [ commandTopic=\"lamp/set\" ]\r\n\
  \x20 }\r\n\
  }\r\n\
  \r\n\
  Device astro:sun:home \"Sun\" [\r\n\
  \x20 interval=300\r\n\
  ]\r\n\
  \r\n";

const EXPECTED_ITEMS: &str = "Group gLiving \"Living Room\"\r\n\
  \r\n\
  Number:Temperature Temp \"Temperature °C\" {\r\n\
  \x20 channel=\"astro:sun:home:temp\" [\r\n\
  \x20     profile=\"system:offset\",\r\n\
  \x20     offset=\"0.5\"\r\n\
  \x20   ],\r\n\
  \x20 stateDescription=\" \" [\r\n\
  \x20     readOnly=\"true\"\r\n\
  \x20   ]\r\n\
  }\r\n\
  \r\n\
  Switch Light1 \"Living Room Light\" <light> ( gLiving ) [ \"Lighting\" ] {\r\n\
  \x20 channel=\"mqtt:topic:home:lamp:power\"\r\n\
  }\r\n";

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(label: &str) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "jsondb_export_{}_{}_{}",
            label,
            process::id(),
            timestamp
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn write_database(dir: &Path) {
    fs::write(dir.join(DEVICES_FILE), THINGS).unwrap();
    fs::write(dir.join(VARIABLES_FILE), ITEMS).unwrap();
    fs::write(dir.join(LINKS_FILE), LINKS).unwrap();
    fs::write(dir.join(ANNOTATIONS_FILE), METADATA).unwrap();
}

fn decode(bytes: &[u8]) -> String {
    // Every byte of the fixture output is ASCII or Latin-1.
    bytes.iter().map(|b| char::from(*b)).collect()
}

#[test]
fn exports_full_database() {
    let input = TempDir::new("input");
    let output = TempDir::new("output");
    write_database(&input.path);

    let summary =
        export_folder(&input.path, &output.path, "home", &ExportConfig::default()).unwrap();
    assert_eq!(summary.containers, 1);
    assert_eq!(summary.devices, 2);
    assert_eq!(summary.variables, 3);
    assert_eq!(summary.replaced_characters, 0);
    assert_eq!(summary.devices_path, output.path.join("home.things"));

    let things = fs::read(&summary.devices_path).unwrap();
    assert_eq!(decode(&things), EXPECTED_THINGS);

    let items = fs::read(&summary.variables_path).unwrap();
    assert!(items.contains(&0xB0), "degree sign is a single CP1252 byte");
    assert_eq!(decode(&items), EXPECTED_ITEMS);
}

#[test]
fn filter_and_default_endpoints() {
    let input = TempDir::new("input");
    let output = TempDir::new("output");
    write_database(&input.path);

    let config = ExportConfig {
        filter: Some("^astro|^Temp".to_string()),
        render: RenderOptions {
            include_default_endpoints: true,
            inline_device_properties: true,
            ..RenderOptions::default()
        },
    };
    let summary = export_folder(&input.path, &output.path, "jsondb", &config).unwrap();
    assert_eq!(summary.containers, 0);
    assert_eq!(summary.devices, 1);

    let things = decode(&fs::read(&summary.devices_path).unwrap());
    assert_eq!(
        things,
        "Device astro:sun:home \"Sun\" [ interval=300 ] {\r\n  \
         Endpoints:\r\n    \
         Trigger String : rise#event\r\n\
         }\r\n\r\n"
    );

    let items = decode(&fs::read(&summary.variables_path).unwrap());
    assert!(items.starts_with("Number:Temperature Temp "));
    assert!(!items.contains("Light1"));
}

#[test]
fn missing_files_produce_empty_outputs() {
    let input = TempDir::new("input");
    let output = TempDir::new("output");

    let summary =
        export_folder(&input.path, &output.path, "empty", &ExportConfig::default()).unwrap();
    assert_eq!(fs::read(&summary.devices_path).unwrap(), Vec::<u8>::new());
    assert_eq!(fs::read(&summary.variables_path).unwrap(), Vec::<u8>::new());
}

#[test]
fn dangling_container_writes_nothing() {
    let input = TempDir::new("input");
    let output = TempDir::new("output");
    fs::write(
        input.path.join(DEVICES_FILE),
        r#"{ "zwave:device:gone:n1": { "UID": "zwave:device:gone:n1", "bridgeUID": "zwave:serial:gone" } }"#,
    )
    .unwrap();

    match export_folder(&input.path, &output.path, "jsondb", &ExportConfig::default()) {
        Err(ExportError::UnknownContainer { container, .. }) => {
            assert_eq!(container, "zwave:serial:gone")
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!output.path.join("jsondb.things").exists());
    assert!(!output.path.join("jsondb.items").exists());
}
