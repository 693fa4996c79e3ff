//! # Devices, Containers and Endpoints
//!
//! The device half of the configuration. A standalone device renders with its full
//! `namespace:type:device` id; a device hosted by a [`Container`] renders nested inside it with
//! the short `type device` form. Endpoints render inside their device's block, and only when they
//! carry properties (or when the run asks for default endpoints too).
//!
//! ```text
//! Container mqtt:broker:home "Broker" [
//!   host="10.0.0.2"
//! ] {
//!   Device topic lamp "Lamp" {
//!     Endpoints:
//!       State Switch : power "Power" [ commandTopic="lamp/set" ]
//!   }
//! }
//!
//! ```

use crate::render::{NEWLINE, Render, pad};
use crate::value::quote;
use crate::{PropertyList, RenderOptions};

/// Namespaces whose binding requires a constant type id in standalone device headers.
const VENDOR_TYPE_OVERRIDES: &[(&str, &str)] = &[("shelly", "shellydevice")];

/// Returns the fixed type literal for `namespace`, if that vendor has one.
pub fn vendor_type_override(namespace: &str) -> Option<&'static str> {
    VENDOR_TYPE_OVERRIDES
        .iter()
        .find(|(vendor, _)| *vendor == namespace)
        .map(|(_, literal)| *literal)
}

fn render_label_and_location(label: Option<&str>, location: Option<&str>) -> String {
    let mut text = String::new();
    if let Some(label) = label {
        text.push(' ');
        text.push_str(&quote(label));
    }
    if let Some(location) = location {
        text.push_str(" @ ");
        text.push_str(&quote(location));
    }
    text
}

fn render_properties(properties: &PropertyList, indent: usize, single_line: bool) -> String {
    if properties.is_empty() {
        String::new()
    } else {
        format!(" {}", properties.render(indent, single_line))
    }
}

///////////////////////////////////////////// Endpoint /////////////////////////////////////////////

/// Whether an endpoint carries state or fires events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointKind {
    /// A state endpoint.
    State,
    /// An event-only endpoint; its data type is always `String`.
    Trigger,
    /// Any other kind keyword, kept as read.
    Other(String),
}

impl EndpointKind {
    /// Parses a raw kind keyword; matching is case-insensitive.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "state" => EndpointKind::State,
            "trigger" => EndpointKind::Trigger,
            _ => EndpointKind::Other(raw.to_string()),
        }
    }

    /// The keyword as it appears in the file: first letter upper case, the rest lower case.
    pub fn keyword(&self) -> String {
        match self {
            EndpointKind::State => "State".to_string(),
            EndpointKind::Trigger => "Trigger".to_string(),
            EndpointKind::Other(raw) => {
                let mut chars = raw.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
        }
    }
}

/// One data or command point of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// State, trigger, ...
    pub kind: EndpointKind,
    /// Declared data type, e.g. `Switch` or `Number:Temperature`.
    pub data_type: String,
    /// Last segment of the endpoint's full id.
    pub id: String,
    /// Optional label.
    pub display_name: Option<String>,
    /// Endpoint configuration.
    pub properties: PropertyList,
}

impl Endpoint {
    /// The data type written to the file.
    pub fn effective_data_type(&self) -> &str {
        match self.kind {
            EndpointKind::Trigger => "String",
            _ => &self.data_type,
        }
    }

    /// True if this endpoint renders under `options`.
    pub fn is_rendered(&self, options: &RenderOptions) -> bool {
        !self.properties.is_empty() || options.include_default_endpoints
    }
}

impl Render for Endpoint {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        if !self.is_rendered(options) {
            return String::new();
        }
        let mut text = format!(
            "{}{} {} : {}",
            pad(indent),
            self.kind.keyword(),
            self.effective_data_type(),
            self.id
        );
        if let Some(label) = &self.display_name {
            text.push(' ');
            text.push_str(&quote(label));
        }
        text.push_str(&render_properties(
            &self.properties,
            indent,
            options.inline_endpoint_properties,
        ));
        text.push_str(NEWLINE);
        text
    }
}

////////////////////////////////////////////// Device //////////////////////////////////////////////

/// A managed unit, either standalone or hosted by a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Binding namespace, first id segment.
    pub namespace_id: String,
    /// Device type id.
    pub type_id: String,
    /// Id of the hosting container, set for container children only.
    pub container_id: Option<String>,
    /// Last id segment.
    pub device_id: String,
    /// Optional label.
    pub display_name: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Device configuration.
    pub properties: PropertyList,
    /// Endpoints in discovery order.
    pub endpoints: Vec<Endpoint>,
}

impl Device {
    /// True if the device is hosted by a container.
    pub fn is_container_child(&self) -> bool {
        self.container_id.is_some()
    }

    /// The full hierarchical id.
    pub fn uid(&self) -> String {
        match &self.container_id {
            Some(container) => format!(
                "{}:{}:{}:{}",
                self.namespace_id, self.type_id, container, self.device_id
            ),
            None => format!("{}:{}:{}", self.namespace_id, self.type_id, self.device_id),
        }
    }

    fn header(&self, nested: bool) -> String {
        if nested {
            format!("Device {} {}", self.type_id, self.device_id)
        } else {
            let type_id = vendor_type_override(&self.namespace_id).unwrap_or(&self.type_id);
            format!(
                "Device {}:{}:{}",
                self.namespace_id, type_id, self.device_id
            )
        }
    }

    /// Renders the device; `nested` selects the short header used inside a container block.
    pub fn render_at(&self, options: &RenderOptions, indent: usize, nested: bool) -> String {
        let mut text = pad(indent);
        text.push_str(&self.header(nested));
        text.push_str(&render_label_and_location(
            self.display_name.as_deref(),
            self.location.as_deref(),
        ));
        text.push_str(&render_properties(
            &self.properties,
            indent,
            options.inline_device_properties,
        ));

        let endpoints: Vec<String> = self
            .endpoints
            .iter()
            .map(|endpoint| endpoint.render(options, indent + 4))
            .filter(|rendered| !rendered.is_empty())
            .collect();
        if !endpoints.is_empty() {
            text.push_str(" {");
            text.push_str(NEWLINE);
            text.push_str(&pad(indent + 2));
            text.push_str("Endpoints:");
            text.push_str(NEWLINE);
            for endpoint in &endpoints {
                text.push_str(endpoint);
            }
            text.push_str(&pad(indent));
            text.push('}');
        }
        text.push_str(NEWLINE);
        if !nested {
            text.push_str(NEWLINE);
        }
        text
    }
}

impl Render for Device {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        self.render_at(options, indent, self.is_container_child())
    }
}

///////////////////////////////////////////// Container ////////////////////////////////////////////

/// A device that hosts other devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Binding namespace.
    pub namespace_id: String,
    /// Container type id.
    pub container_type_id: String,
    /// Container id, last segment.
    pub container_id: String,
    /// Optional label.
    pub display_name: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Container configuration.
    pub properties: PropertyList,
    /// Hosted devices in discovery order.
    pub children: Vec<Device>,
}

impl Container {
    /// The full `namespace:type:container` id.
    pub fn uid(&self) -> String {
        format!(
            "{}:{}:{}",
            self.namespace_id, self.container_type_id, self.container_id
        )
    }
}

impl Render for Container {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        let mut text = format!("{}Container {}", pad(indent), self.uid());
        text.push_str(&render_label_and_location(
            self.display_name.as_deref(),
            self.location.as_deref(),
        ));
        text.push_str(&render_properties(
            &self.properties,
            indent,
            options.inline_container_properties,
        ));
        if !self.children.is_empty() {
            text.push_str(" {");
            text.push_str(NEWLINE);
            for child in &self.children {
                text.push_str(&child.render_at(options, indent + 2, true));
            }
            text.push_str(&pad(indent));
            text.push('}');
        }
        text.push_str(NEWLINE);
        text.push_str(NEWLINE);
        text
    }
}
