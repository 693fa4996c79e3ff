//! # Variables, Links and Annotations
//!
//! The variable half of the configuration. A variable line carries its data type (with an
//! optional aggregate suffix for groups), name, label, icon, groups and tags, followed by a curly
//! block holding its links to endpoints and its annotations:
//!
//! ```text
//! Switch Light1 "Living Room Light" <light> ( gLiving ) [ "Lighting" ] {
//!   channel="acme:switch:dev1:power",
//!   stateDescription=" " [
//!       readOnly="true"
//!     ]
//! }
//! ```

use crate::property::{Brackets, render_list};
use crate::render::{NEWLINE, Render, pad};
use crate::value::quote;
use crate::{PropertyList, RenderOptions};

/// Aggregate function whose single parameter is quoted instead of parenthesized.
const COUNT_FUNCTION: &str = "COUNT";

/////////////////////////////////////////////// Link ///////////////////////////////////////////////

/// Association of a variable with one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Record name the link was read from.
    pub name: String,
    /// Fully qualified endpoint id.
    pub endpoint_full_id: String,
    /// Name of the owning variable.
    pub variable_name: String,
    /// Link configuration; values render in metadata mode.
    pub properties: PropertyList,
}

impl Render for Link {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        let mut text = format!("channel={}", quote(&self.endpoint_full_id));
        if !self.properties.is_empty() {
            text.push(' ');
            text.push_str(
                &self
                    .properties
                    .render(indent + 2, options.inline_variable_entries),
            );
        }
        text
    }
}

//////////////////////////////////////////// Annotation ////////////////////////////////////////////

/// A namespaced fact attached to a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Record name, `namespace:variableName`.
    pub name: String,
    /// Annotation namespace.
    pub namespace: String,
    /// Main value.
    pub value: String,
    /// Name of the owning variable.
    pub variable_name: String,
    /// Annotation configuration; values render in metadata mode.
    pub properties: PropertyList,
}

impl Render for Annotation {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        let mut text = format!("{}={}", self.namespace, quote(&self.value));
        if !self.properties.is_empty() {
            text.push(' ');
            text.push_str(
                &self
                    .properties
                    .render(indent + 2, options.inline_variable_entries),
            );
        }
        text
    }
}

////////////////////////////////////////////// Entry ///////////////////////////////////////////////

/// One member of a variable's curly block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A link to an endpoint.
    Link(Link),
    /// An annotation.
    Annotation(Annotation),
}

impl Render for Entry {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        match self {
            Entry::Link(link) => link.render(options, indent),
            Entry::Annotation(annotation) => annotation.render(options, indent),
        }
    }
}

///////////////////////////////////////////// Variable /////////////////////////////////////////////

/// A named logical value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    /// Data type, e.g. `Switch`, `Number:Temperature` or `Group`.
    pub data_type: String,
    /// Variable name.
    pub name: String,
    /// Label; rendered even when empty.
    pub display_name: String,
    /// Category as read from the snapshot.
    pub category: Option<String>,
    /// Icon rendered as `<icon>`.
    pub icon_name: Option<String>,
    /// Group memberships.
    pub groups: Vec<String>,
    /// Semantic tags.
    pub tags: Vec<String>,
    /// Links followed by annotations.
    pub entries: Vec<Entry>,
    /// Base type of a group with a function.
    pub aggregate_base_type: Option<String>,
    /// Aggregate function name.
    pub aggregate_function: Option<String>,
    /// Aggregate function parameters.
    pub aggregate_params: Vec<String>,
}

impl Variable {
    /// Renders `dataType[:baseType[:function[params]]]`.
    pub fn type_signature(&self) -> String {
        let mut text = self.data_type.clone();
        let Some(base) = &self.aggregate_base_type else {
            return text;
        };
        text.push(':');
        text.push_str(base);
        if let Some(function) = &self.aggregate_function {
            text.push(':');
            text.push_str(function);
            if function.eq_ignore_ascii_case(COUNT_FUNCTION) {
                if let Some(param) = self.aggregate_params.first() {
                    text.push_str(&quote(param));
                }
            } else if !self.aggregate_params.is_empty() {
                text.push('(');
                text.push_str(&self.aggregate_params.join(","));
                text.push(')');
            }
        }
        text
    }
}

impl Render for Variable {
    fn render(&self, options: &RenderOptions, indent: usize) -> String {
        let mut text = format!(
            "{}{} {} {}",
            pad(indent),
            self.type_signature(),
            self.name,
            quote(&self.display_name)
        );
        if let Some(icon) = &self.icon_name {
            text.push_str(&format!(" <{}>", icon));
        }
        if !self.groups.is_empty() {
            text.push_str(&format!(" ( {} )", self.groups.join(", ")));
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|tag| quote(tag)).collect();
            text.push_str(&format!(" [ {} ]", tags.join(", ")));
        }
        let entries: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.render(options, indent + 2))
            .collect();
        if !entries.is_empty() {
            text.push(' ');
            text.push_str(&render_list(
                &entries,
                Brackets::Curly,
                indent,
                options.inline_variable_entries,
            ));
        }
        text.push_str(NEWLINE);
        text
    }
}
