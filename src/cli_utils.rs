use std::process;

use handled::Handle;

use crate::{ExportError, UserError};

/// Exits the program with an error message
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exits the program with an error message and usage information
pub fn exit_with_usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", usage);
    process::exit(1);
}

/// Exits the program with an export error, followed by its usage hint when there is one
pub fn exit_with_export_error(err: &ExportError) -> ! {
    match Handle::<UserError>::handle(err) {
        Some(UserError {
            message,
            usage_hint: Some(hint),
        }) => exit_with_usage_error(&message, &hint),
        Some(UserError { message, .. }) => exit_with_error(&message),
        None => exit_with_error(&err.to_string()),
    }
}

/// Prints a formatted success message
pub fn print_success(message: &str) {
    println!("{}", message);
}
