//! # Input Records
//!
//! The catalog builders never look at JSON. They consume these typed property bags, one vector
//! per category in discovery order, produced by whatever reads the snapshot ([`crate::jsondb`]
//! for files on disk, struct literals in tests).
//!
//! This module is the input boundary. A reader types each configuration value one of two ways:
//!
//! - from the source's own scalar types, as [`crate::jsondb`] does with JSON, via
//!   [`RawProperty::typed`];
//! - from a type-annotated definition string `<type> <key>=<value>`, via
//!   [`RawProperty::parse_definition`], for sources that record values that way.
//!
//! ```rust
//! use jsondb_export::ValueType;
//! use jsondb_export::record::RawProperty;
//!
//! let property = RawProperty::parse_definition("decimal offset=0,5").unwrap();
//! assert_eq!(property.value_type, Some(ValueType::Decimal));
//! assert_eq!(property.to_typed_value(true).unwrap().render(), "\"0.5\"");
//! ```

use crate::{ExportError, PropertyList, TypedValue, ValueType};

/////////////////////////////////////////// RawProperty ////////////////////////////////////////////

/// One configuration value before validation: a name, an optional declared type and raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    /// Property name.
    pub name: String,
    /// Declared type; `None` means the type is inferred from `raw`.
    pub value_type: Option<ValueType>,
    /// Raw text.
    pub raw: String,
}

impl RawProperty {
    /// Creates a property with a declared type.
    pub fn typed(value_type: ValueType, name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: Some(value_type),
            raw: raw.into(),
        }
    }

    /// Creates a property whose type will be inferred.
    pub fn untyped(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
            raw: raw.into(),
        }
    }

    /// Parses a type-annotated definition such as `decimal offset=0.5` or `string host=a b`.
    ///
    /// Only the first `=` separates key from value, so values may contain `=`. Without a type
    /// word (`key=value`) the type is inferred later.
    pub fn parse_definition(definition: &str) -> Result<Self, ExportError> {
        let (head, raw) = definition
            .split_once('=')
            .ok_or_else(|| ExportError::InvalidDefinition(definition.to_string()))?;
        let head = head.trim();
        let (value_type, name) = match head.rsplit_once(char::is_whitespace) {
            Some((type_word, name)) => (Some(ValueType::from_type_name(type_word)), name.trim()),
            None => (None, head),
        };
        if name.is_empty() {
            return Err(ExportError::InvalidDefinition(definition.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            value_type,
            raw: raw.to_string(),
        })
    }

    /// Validates the property into a [`TypedValue`].
    pub fn to_typed_value(&self, metadata_mode: bool) -> Result<TypedValue, ExportError> {
        match self.value_type {
            Some(value_type) => {
                TypedValue::new(value_type, self.name.as_str(), self.raw.as_str(), metadata_mode)
            }
            None => {
                let mut value = TypedValue::infer(self.name.as_str(), self.raw.as_str());
                value.metadata_mode = metadata_mode;
                Ok(value)
            }
        }
    }
}

/// Validates a sequence of raw properties into a [`PropertyList`], keeping their order.
pub fn to_property_list(
    properties: &[RawProperty],
    metadata_mode: bool,
) -> Result<PropertyList, ExportError> {
    properties
        .iter()
        .map(|property| property.to_typed_value(metadata_mode))
        .collect()
}

///////////////////////////////////////////// Records //////////////////////////////////////////////

/// A device or container record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Record name; usually the device's hierarchical id.
    pub name: String,
    /// Hierarchical id, `ns:type:device` or `ns:type:container:device`.
    pub uid: String,
    /// Id of the hosting container, if any.
    pub container_uid: Option<String>,
    /// True if this record describes a container.
    pub is_container: bool,
    /// Optional label.
    pub label: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Configuration values in source order.
    pub configuration: Vec<RawProperty>,
    /// Endpoints in source order.
    pub endpoints: Vec<EndpointRecord>,
}

/// An endpoint of a device record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointRecord {
    /// Fully qualified endpoint id.
    pub uid: String,
    /// Kind keyword, e.g. `STATE` or `TRIGGER`.
    pub kind: String,
    /// Declared data type.
    pub data_type: Option<String>,
    /// Endpoint type id, used when no data type is declared.
    pub endpoint_type_uid: Option<String>,
    /// Optional label.
    pub label: Option<String>,
    /// Configuration values in source order.
    pub configuration: Vec<RawProperty>,
}

/// A variable record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRecord {
    /// Variable name.
    pub name: String,
    /// Data type.
    pub data_type: String,
    /// Optional label.
    pub label: Option<String>,
    /// Optional category.
    pub category: Option<String>,
    /// Optional explicit icon.
    pub icon_name: Option<String>,
    /// Group memberships.
    pub groups: Vec<String>,
    /// Semantic tags.
    pub tags: Vec<String>,
    /// Aggregate base type for groups.
    pub base_type: Option<String>,
    /// Aggregate function name.
    pub function_name: Option<String>,
    /// Aggregate function parameters.
    pub function_params: Vec<String>,
}

/// A link record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRecord {
    /// Record name, conventionally `variable -> endpoint`.
    pub name: String,
    /// Owning variable, if recorded explicitly.
    pub variable_name: Option<String>,
    /// Fully qualified endpoint id.
    pub endpoint_uid: String,
    /// Configuration values in source order.
    pub configuration: Vec<RawProperty>,
}

/// An annotation record, named `namespace:variableName`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// Record name.
    pub name: String,
    /// Main value.
    pub value: String,
    /// Configuration values in source order.
    pub configuration: Vec<RawProperty>,
}

/// Every record of one snapshot, per category, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    /// Device and container records.
    pub devices: Vec<DeviceRecord>,
    /// Variable records.
    pub variables: Vec<VariableRecord>,
    /// Link records.
    pub links: Vec<LinkRecord>,
    /// Annotation records.
    pub annotations: Vec<AnnotationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_typed_definition() {
        let property = RawProperty::parse_definition("decimal offset=0,5").unwrap();
        assert_eq!(property, RawProperty::typed(ValueType::Decimal, "offset", "0,5"));
    }

    #[test]
    fn parse_definition_keeps_equals_in_value() {
        let property = RawProperty::parse_definition("string filter=a=b").unwrap();
        assert_eq!(property.name, "filter");
        assert_eq!(property.raw, "a=b");
        assert_eq!(property.value_type, Some(ValueType::String));
    }

    #[test]
    fn parse_untyped_definition() {
        let property = RawProperty::parse_definition("port=1883").unwrap();
        assert_eq!(property.value_type, None);
        let value = property.to_typed_value(false).unwrap();
        assert_eq!(value.value_type(), ValueType::Int);
    }

    #[test]
    fn parse_unknown_type_word() {
        let property = RawProperty::parse_definition("Object[] items=a, b").unwrap();
        assert_eq!(property.value_type, Some(ValueType::Other));
        assert_eq!(property.to_typed_value(false).unwrap().render(), "a, b");
    }

    #[test]
    fn invalid_definitions() {
        assert!(matches!(
            RawProperty::parse_definition("no equals sign"),
            Err(ExportError::InvalidDefinition(_))
        ));
        assert!(matches!(
            RawProperty::parse_definition("=value"),
            Err(ExportError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn property_list_fails_on_first_bad_value() {
        let properties = vec![
            RawProperty::typed(ValueType::Int, "port", "1883"),
            RawProperty::typed(ValueType::Decimal, "offset", "a lot"),
        ];
        assert!(matches!(
            to_property_list(&properties, false),
            Err(ExportError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn property_list_metadata_mode() {
        let properties = vec![
            RawProperty::typed(ValueType::Decimal, "offset", "1.5"),
            RawProperty::untyped("enabled", "true"),
        ];
        let list = to_property_list(&properties, true).unwrap();
        assert_eq!(list.render(0, true), "[ offset=\"1.5\", enabled=\"true\" ]");
    }
}
