//! # Catalog Building
//!
//! Turns a [`RecordSet`] into the two entity collections that are written out: devices (with
//! their containers) and variables (with their links and annotations).
//!
//! Both builders run in two phases. Phase one materializes every entity that others refer to
//! (containers; links and annotations) and indexes it by its identity key. Phase two
//! materializes the owners and resolves their references through the index.
//!
//! Ordering is deterministic: containers come first, then standalone devices, each group stably
//! sorted by namespace; variables are stably sorted by data type, then name. A variable's links
//! always precede its annotations, each in discovery order.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::device::EndpointKind;
use crate::record::{
    AnnotationRecord, DeviceRecord, EndpointRecord, LinkRecord, VariableRecord, to_property_list,
};
use crate::render::{NEWLINE, Render};
use crate::variable::Entry;
use crate::{
    Annotation, Container, Device, Endpoint, ExportConfig, ExportError, Link, NameFilter,
    RecordSet, RenderOptions, Variable,
};

/// Separator between variable and endpoint in conventional link record names.
const LINK_NAME_SEPARATOR: &str = " -> ";

fn split_id<const N: usize>(
    record: &str,
    field: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<[String; N], ExportError> {
    let segments: Vec<String> = value.split(':').map(str::to_string).collect();
    segments.try_into().map_err(|_| ExportError::MalformedId {
        record: record.to_string(),
        field,
        value: value.to_string(),
        expected,
    })
}

////////////////////////////////////////////// Devices /////////////////////////////////////////////

/// Containers and standalone devices, in output order once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCatalog {
    /// Containers with their children.
    pub containers: Vec<Container>,
    /// Devices not hosted by any container.
    pub devices: Vec<Device>,
}

impl DeviceCatalog {
    /// Sorts both groups stably by namespace.
    pub fn sort(&mut self) {
        self.containers
            .sort_by(|a, b| a.namespace_id.cmp(&b.namespace_id));
        self.devices
            .sort_by(|a, b| a.namespace_id.cmp(&b.namespace_id));
    }

    /// Renders containers, then standalone devices.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut text = String::new();
        for container in &self.containers {
            text.push_str(&container.render(options, 0));
        }
        for device in &self.devices {
            text.push_str(&device.render(options, 0));
        }
        text
    }

    /// Total number of devices, hosted or standalone.
    pub fn device_count(&self) -> usize {
        self.devices.len()
            + self
                .containers
                .iter()
                .map(|container| container.children.len())
                .sum::<usize>()
    }
}

fn build_container(record: &DeviceRecord) -> Result<Container, ExportError> {
    let [namespace_id, container_type_id, container_id] = split_id::<3>(
        &record.name,
        "UID",
        &record.uid,
        "namespace:type:container",
    )?;
    Ok(Container {
        namespace_id,
        container_type_id,
        container_id,
        display_name: record.label.clone(),
        location: record.location.clone(),
        properties: to_property_list(&record.configuration, false)
            .map_err(|e| e.in_record(&record.name))?,
        children: Vec::new(),
    })
}

fn build_endpoint(record: &DeviceRecord, endpoint: &EndpointRecord) -> Result<Endpoint, ExportError> {
    let id = endpoint
        .uid
        .rsplit(':')
        .next()
        .unwrap_or_default()
        .to_string();
    let data_type = endpoint
        .data_type
        .clone()
        .or_else(|| {
            endpoint
                .endpoint_type_uid
                .as_deref()
                .and_then(|uid| uid.rsplit(':').next())
                .map(str::to_string)
        })
        .unwrap_or_default();
    let properties = to_property_list(&endpoint.configuration, false)
        .map_err(|e| e.in_record(&format!("{} / {}", record.name, endpoint.uid)))?;
    Ok(Endpoint {
        kind: EndpointKind::parse(&endpoint.kind),
        data_type,
        id,
        display_name: endpoint.label.clone(),
        properties,
    })
}

fn build_device(record: &DeviceRecord) -> Result<Device, ExportError> {
    let (namespace_id, type_id, container_id, device_id) = match &record.container_uid {
        Some(_) => {
            let [namespace, type_id, container, device] = split_id::<4>(
                &record.name,
                "UID",
                &record.uid,
                "namespace:type:container:device",
            )?;
            (namespace, type_id, Some(container), device)
        }
        None => {
            let [namespace, type_id, device] =
                split_id::<3>(&record.name, "UID", &record.uid, "namespace:type:device")?;
            (namespace, type_id, None, device)
        }
    };
    let endpoints = record
        .endpoints
        .iter()
        .map(|endpoint| build_endpoint(record, endpoint))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Device {
        namespace_id,
        type_id,
        container_id,
        device_id,
        display_name: record.label.clone(),
        location: record.location.clone(),
        properties: to_property_list(&record.configuration, false)
            .map_err(|e| e.in_record(&record.name))?,
        endpoints,
    })
}

/// Builds containers and devices from device records.
///
/// Every container is materialized first so that hosted devices can be attached to it. A device
/// that names a container missing from the snapshot is a fatal error. A container is kept in the
/// result when its own name passes `filter` or when it hosts at least one device that does.
pub fn build_devices(
    records: &[DeviceRecord],
    filter: &NameFilter,
) -> Result<DeviceCatalog, ExportError> {
    // Phase one: containers, indexed by their three-part id.
    let mut containers = Vec::new();
    let mut selected = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in records.iter().filter(|record| record.is_container) {
        let container = build_container(record)?;
        debug!("container {}", container.uid());
        index.insert(container.uid(), containers.len());
        selected.push(filter.matches(&record.name));
        containers.push(container);
    }

    // Phase two: devices, attached to their container or kept standalone.
    let mut devices = Vec::new();
    let mut skipped = 0;
    for record in records.iter().filter(|record| !record.is_container) {
        if !filter.matches(&record.name) {
            skipped += 1;
            continue;
        }
        let device = build_device(record)?;
        debug!("device {}", device.uid());
        match &record.container_uid {
            Some(container_uid) => {
                let [namespace, type_id, container] = split_id::<3>(
                    &record.name,
                    "bridgeUID",
                    container_uid,
                    "namespace:type:container",
                )?;
                let key = format!("{}:{}:{}", namespace, type_id, container);
                let position = *index.get(&key).ok_or_else(|| ExportError::UnknownContainer {
                    record: record.name.clone(),
                    container: key.clone(),
                })?;
                containers[position].children.push(device);
            }
            None => devices.push(device),
        }
    }

    let containers: Vec<Container> = containers
        .into_iter()
        .zip(selected)
        .filter(|(container, selected)| *selected || !container.children.is_empty())
        .map(|(container, _)| container)
        .collect();

    let mut catalog = DeviceCatalog {
        containers,
        devices,
    };
    catalog.sort();
    info!(
        "built {} containers and {} devices ({} device records filtered out)",
        catalog.containers.len(),
        catalog.device_count(),
        skipped
    );
    Ok(catalog)
}

///////////////////////////////////////////// Variables ////////////////////////////////////////////

/// Variables in output order once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableCatalog {
    /// The variables.
    pub variables: Vec<Variable>,
}

impl VariableCatalog {
    /// Sorts stably by data type, then name.
    pub fn sort(&mut self) {
        self.variables.sort_by(|a, b| {
            a.data_type
                .cmp(&b.data_type)
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    /// Renders every variable, with a blank line between consecutive variables.
    pub fn render(&self, options: &RenderOptions) -> String {
        self.variables
            .iter()
            .map(|variable| variable.render(options, 0))
            .collect::<Vec<_>>()
            .join(NEWLINE)
    }
}

fn build_link(record: &LinkRecord) -> Result<Link, ExportError> {
    let variable_name = match &record.variable_name {
        Some(name) => name.clone(),
        None => record
            .name
            .split(LINK_NAME_SEPARATOR)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
    };
    Ok(Link {
        name: record.name.clone(),
        endpoint_full_id: record.endpoint_uid.clone(),
        variable_name,
        properties: to_property_list(&record.configuration, true)
            .map_err(|e| e.in_record(&record.name))?,
    })
}

fn build_annotation(record: &AnnotationRecord) -> Result<Annotation, ExportError> {
    let (namespace, variable_name) =
        record.name.split_once(':').ok_or_else(|| ExportError::MalformedId {
            record: record.name.clone(),
            field: "name",
            value: record.name.clone(),
            expected: "namespace:variableName",
        })?;
    Ok(Annotation {
        name: record.name.clone(),
        namespace: namespace.to_string(),
        value: record.value.clone(),
        variable_name: variable_name.to_string(),
        properties: to_property_list(&record.configuration, true)
            .map_err(|e| e.in_record(&record.name))?,
    })
}

fn build_variable(record: &VariableRecord, entries: Vec<Entry>) -> Variable {
    Variable {
        data_type: record.data_type.clone(),
        name: record.name.clone(),
        display_name: record.label.clone().unwrap_or_default(),
        category: record.category.clone(),
        icon_name: record.icon_name.clone().or_else(|| record.category.clone()),
        groups: record.groups.clone(),
        tags: record.tags.clone(),
        entries,
        aggregate_base_type: record.base_type.clone(),
        aggregate_function: record.function_name.clone(),
        aggregate_params: record.function_params.clone(),
    }
}

/// Builds variables and attaches their links and annotations by variable name.
///
/// Links and annotations whose variable is not built (absent or filtered out) are dropped with
/// a warning.
pub fn build_variables(
    variables: &[VariableRecord],
    links: &[LinkRecord],
    annotations: &[AnnotationRecord],
    filter: &NameFilter,
) -> Result<VariableCatalog, ExportError> {
    // Phase one: links, then annotations, indexed by owning variable.
    let mut index: HashMap<String, Vec<Entry>> = HashMap::new();
    for record in links.iter().filter(|record| filter.matches(&record.name)) {
        let link = build_link(record)?;
        index
            .entry(link.variable_name.clone())
            .or_default()
            .push(Entry::Link(link));
    }
    for record in annotations
        .iter()
        .filter(|record| filter.matches(&record.name))
    {
        let annotation = build_annotation(record)?;
        index
            .entry(annotation.variable_name.clone())
            .or_default()
            .push(Entry::Annotation(annotation));
    }

    // Phase two: variables claim their entries.
    let mut catalog = VariableCatalog::default();
    for record in variables
        .iter()
        .filter(|record| filter.matches(&record.name))
    {
        let entries = index.remove(&record.name).unwrap_or_default();
        debug!("variable {} with {} entries", record.name, entries.len());
        catalog.variables.push(build_variable(record, entries));
    }

    let mut dangling: Vec<&String> = index.keys().collect();
    dangling.sort();
    for name in dangling {
        warn!(
            "dropping {} link/annotation entries of unknown variable '{}'",
            index[name].len(),
            name
        );
    }

    catalog.sort();
    info!("built {} variables", catalog.variables.len());
    Ok(catalog)
}

////////////////////////////////////////////// Catalog /////////////////////////////////////////////

/// Both halves of one snapshot, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Containers and devices.
    pub devices: DeviceCatalog,
    /// Variables.
    pub variables: VariableCatalog,
}

impl Catalog {
    /// Builds both halves from `records`, applying the configured name filter.
    pub fn build(records: &RecordSet, config: &ExportConfig) -> Result<Self, ExportError> {
        let filter = config.name_filter()?;
        Ok(Self {
            devices: build_devices(&records.devices, &filter)?,
            variables: build_variables(
                &records.variables,
                &records.links,
                &records.annotations,
                &filter,
            )?,
        })
    }
}
