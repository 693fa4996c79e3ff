use std::path::{Path, PathBuf};

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use jsondb_export::ExportConfig;
use jsondb_export::cli_utils;
use jsondb_export::output::export_folder;

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Folder holding the JSON database files")]
    input: String,
    #[arrrg(optional, "Folder the generated files are written to")]
    output: String,
    #[arrrg(optional, "Base name of the generated files (default: jsondb)")]
    name: String,
    #[arrrg(optional, "Regular expression selecting record names to export")]
    filter: String,
    #[arrrg(optional, "YAML or JSON file with render options and filter")]
    config: String,
    #[arrrg(flag, "Emit endpoints that carry no properties")]
    include_default_endpoints: bool,
    #[arrrg(flag, "Render container properties on the header line")]
    inline_container_properties: bool,
    #[arrrg(flag, "Render device properties on the header line")]
    inline_device_properties: bool,
    #[arrrg(flag, "Render endpoint properties one per line")]
    block_endpoint_properties: bool,
    #[arrrg(flag, "Render links and annotations on the variable line")]
    inline_variable_entries: bool,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const USAGE: &str = r#"Usage: jsondb-export --input <dir> --output <dir> [options]

Options:
  --input <dir>                   Folder holding the JSON database files
  --output <dir>                  Folder the generated files are written to
  --name <base>                   Base name of the generated files (default: jsondb)
  --filter <regex>                Regular expression selecting record names to export
  --config <file>                 YAML or JSON file with render options and filter
  --include-default-endpoints     Emit endpoints that carry no properties
  --inline-container-properties   Render container properties on the header line
  --inline-device-properties      Render device properties on the header line
  --block-endpoint-properties     Render endpoint properties one per line
  --inline-variable-entries       Render links and annotations on the variable line
  --verbose                       Enable verbose logging

Writes <base>.things (containers and devices) and <base>.items (variables)."#;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn build_config(options: &Options) -> ExportConfig {
    let mut config = if options.config.is_empty() {
        ExportConfig::default()
    } else {
        ExportConfig::load(Path::new(&options.config))
            .unwrap_or_else(|err| cli_utils::exit_with_export_error(&err))
    };
    if !options.filter.is_empty() {
        config.filter = Some(options.filter.clone());
    }
    let render = &mut config.render;
    render.include_default_endpoints |= options.include_default_endpoints;
    render.inline_container_properties |= options.inline_container_properties;
    render.inline_device_properties |= options.inline_device_properties;
    render.inline_variable_entries |= options.inline_variable_entries;
    if options.block_endpoint_properties {
        render.inline_endpoint_properties = false;
    }
    config
}

fn main() {
    let (options, free) = Options::from_command_line("USAGE: jsondb-export [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", USAGE);
        return;
    }
    if options.input.is_empty() {
        cli_utils::exit_with_usage_error("--input is required", USAGE);
    }
    if options.output.is_empty() {
        cli_utils::exit_with_usage_error("--output is required", USAGE);
    }

    init_logging(options.verbose);
    let config = build_config(&options);
    let base = if options.name.is_empty() {
        "jsondb"
    } else {
        options.name.as_str()
    };

    let input = PathBuf::from(&options.input);
    let output = PathBuf::from(&options.output);
    match export_folder(&input, &output, base, &config) {
        Ok(summary) => {
            cli_utils::print_success(&format!(
                "Exported {} containers and {} devices to {}",
                summary.containers,
                summary.devices,
                summary.devices_path.display()
            ));
            cli_utils::print_success(&format!(
                "Exported {} variables to {}",
                summary.variables,
                summary.variables_path.display()
            ));
        }
        Err(err) => cli_utils::exit_with_export_error(&err),
    }
}
