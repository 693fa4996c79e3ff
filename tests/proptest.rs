use proptest::prelude::*;

use jsondb_export::{Catalog, ExportConfig, TypedValue, ValueType, quote};

/// Reverses [`quote`]; `None` if `quoted` is not a well-formed quoted string.
fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => text.push(chars.next()?),
            '"' => return None,
            other => text.push(other),
        }
    }
    Some(text)
}

/// Property test strategies for generating snapshot records
pub mod strategies {
    use super::*;
    use jsondb_export::{DeviceRecord, RawProperty, RecordSet, VariableRecord};

    /// Strategy for standalone device records with unique ids
    pub fn device_records_strategy() -> impl Strategy<Value = Vec<DeviceRecord>> {
        prop::collection::vec(("[a-z]{1,6}", "[ -~]{0,12}", any::<u16>()), 0..8).prop_map(
            |devices| {
                devices
                    .into_iter()
                    .enumerate()
                    .map(|(id, (namespace, label, port))| {
                        let uid = format!("{}:generic:d{}", namespace, id);
                        DeviceRecord {
                            name: uid.clone(),
                            uid,
                            label: Some(label),
                            configuration: vec![RawProperty::untyped("port", port.to_string())],
                            ..DeviceRecord::default()
                        }
                    })
                    .collect()
            },
        )
    }

    /// Strategy for variable records of a few common data types
    pub fn variable_records_strategy() -> impl Strategy<Value = Vec<VariableRecord>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["Switch", "Number", "String", "Group"]),
                "[A-Za-z][A-Za-z0-9_]{0,8}",
            ),
            0..8,
        )
        .prop_map(|variables| {
            variables
                .into_iter()
                .map(|(data_type, name)| VariableRecord {
                    name,
                    data_type: data_type.to_string(),
                    ..VariableRecord::default()
                })
                .collect()
        })
    }

    /// Strategy for whole record sets without links or annotations
    pub fn record_set_strategy() -> impl Strategy<Value = RecordSet> {
        (device_records_strategy(), variable_records_strategy()).prop_map(
            |(devices, variables)| RecordSet {
                devices,
                variables,
                ..RecordSet::default()
            },
        )
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unsigned_integers_infer_as_int(n in any::<u64>()) {
        let raw = n.to_string();
        let value = TypedValue::infer("n", raw.as_str());
        prop_assert_eq!(value.value_type(), ValueType::Int);
        prop_assert_eq!(value.render(), raw);
    }

    #[test]
    fn decimals_render_with_a_dot(
        whole in any::<i32>(),
        fraction in 0u32..1_000_000,
        metadata_mode in any::<bool>()
    ) {
        let raw = format!("{},{}", whole, fraction);
        let value = TypedValue::new(ValueType::Decimal, "d", raw.as_str(), metadata_mode).unwrap();
        let expected = format!("{}.{}", whole, fraction);
        let rendered = value.render();
        prop_assert!(!rendered.contains(','));
        if metadata_mode {
            prop_assert_eq!(rendered, format!("\"{}\"", expected));
        } else {
            prop_assert_eq!(rendered, expected);
        }
    }

    #[test]
    fn quoted_strings_round_trip(text in any::<String>()) {
        let quoted = quote(&text);
        prop_assert_eq!(unquote(&quoted), Some(text.clone()));

        let value = TypedValue::new(ValueType::String, "s", text.as_str(), true).unwrap();
        prop_assert_eq!(value.render(), quoted);
    }

    #[test]
    fn rendering_is_deterministic(records in strategies::record_set_strategy()) {
        let config = ExportConfig::default();
        let first = Catalog::build(&records, &config).unwrap();
        let second = Catalog::build(&records, &config).unwrap();
        prop_assert_eq!(
            first.devices.render(&config.render),
            second.devices.render(&config.render)
        );
        prop_assert_eq!(
            first.variables.render(&config.render),
            second.variables.render(&config.render)
        );

        let mut resorted = first.clone();
        resorted.devices.sort();
        resorted.variables.sort();
        prop_assert_eq!(resorted, first);
    }

    #[test]
    fn output_uses_crlf_only(records in strategies::record_set_strategy()) {
        let config = ExportConfig::default();
        let catalog = Catalog::build(&records, &config).unwrap();
        let text = catalog.devices.render(&config.render) + &catalog.variables.render(&config.render);
        prop_assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
    }
}
