//! # jsondb-export: Textual Configuration from a JSON Database Snapshot
//!
//! A home-automation platform persists its managed configuration as a folder of JSON files, one
//! per record category. This crate reads such a snapshot and renders it as the platform's
//! human-editable textual configuration format:
//!
//! - **Devices and containers** go to a `.things` file. A container (a bridge or gateway)
//!   nests the devices it hosts; each device lists its endpoints.
//! - **Variables** go to an `.items` file, each with its links to endpoints and its
//!   namespaced annotations.
//!
//! ## Core Concepts
//!
//! ### Records
//! The catalog builders consume a [`RecordSet`]: typed property bags in discovery order. The
//! [`jsondb`] module produces one from the files on disk.
//!
//! ### Typed Values
//! Every configuration value is a [`TypedValue`] whose rendering depends on its
//! [`ValueType`]: strings are quoted and escaped, numbers and booleans are bare, and in
//! metadata mode (link and annotation properties) numbers and booleans are quoted too.
//!
//! ### Catalogs
//! [`Catalog::build`] materializes containers before devices and links/annotations before
//! variables, resolving references through identity indexes, then sorts both collections so
//! the output is deterministic.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ CLI (jsondb-export)                     │
//! ├─────────────────────────────────────────┤
//! │ Output (CP1252, CRLF, atomic writes)    │
//! ├─────────────────────────────────────────┤
//! │ Rendering (Render trait, RenderOptions) │
//! ├─────────────────────────────────────────┤
//! │ Catalog (two-phase build, ordering)     │
//! ├─────────────────────────────────────────┤
//! │ Records (JSON database reader)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! # use jsondb_export::{Catalog, DeviceRecord, ExportConfig, RecordSet};
//! let records = RecordSet {
//!     devices: vec![DeviceRecord {
//!         name: "astro:sun:home".to_string(),
//!         uid: "astro:sun:home".to_string(),
//!         label: Some("Sun".to_string()),
//!         ..DeviceRecord::default()
//!     }],
//!     ..RecordSet::default()
//! };
//! let config = ExportConfig::default();
//! let catalog = Catalog::build(&records, &config).unwrap();
//! assert_eq!(
//!     catalog.devices.render(&config.render),
//!     "Device astro:sun:home \"Sun\"\r\n\r\n"
//! );
//! ```

#![warn(missing_docs)]
mod catalog;
mod config;
mod device;
mod errors;
mod property;
mod render;
mod value;
mod variable;

/// Command-line interface utilities for program termination.
pub mod cli_utils;

/// Reader for the JSON database folder.
///
/// Maps each database file onto the typed records of [`record`].
pub mod jsondb;

/// Encoding and atomic writing of the generated files, plus the whole export pipeline.
pub mod output;

/// Typed input records consumed by the catalog builders.
pub mod record;

pub use catalog::{
    Catalog, DeviceCatalog, VariableCatalog, build_devices, build_variables,
};
pub use config::{ExportConfig, NameFilter, RenderOptions};
pub use device::{Container, Device, Endpoint, EndpointKind, vendor_type_override};
pub use errors::{ExportError, UserError};
pub use property::{Brackets, PropertyList, render_list};
pub use record::{
    AnnotationRecord, DeviceRecord, EndpointRecord, LinkRecord, RawProperty, RecordSet,
    VariableRecord,
};
pub use render::{NEWLINE, Render};
pub use value::{TypedValue, ValueType, quote};
pub use variable::{Annotation, Entry, Link, Variable};
