//! CLI command messaging
//!
//! Colored one-line output printed while the terminal is in normal mode:
//! subcommand results, session start and exit, fatal startup errors.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl CliLevel {
    fn tag(self) -> &'static str {
        match self {
            CliLevel::Info => "\x1b[1;33m[INFO]\x1b[0m",
            CliLevel::Warn => "\x1b[1;91m[WARN]\x1b[0m",
            CliLevel::Error => "\x1b[1;31m[ERROR]\x1b[0m",
            CliLevel::Success => "\x1b[1;32m[SUCCESS]\x1b[0m",
        }
    }
}

/// `[TAG] title`, with the details tab-separated when present.
pub fn format_message(level: CliLevel, title: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{} {}", level.tag(), title)
    } else {
        format!("{} {}\t {}", level.tag(), title, details)
    }
}

pub fn print_info(title: &str, details: &str) {
    println!("{}", format_message(CliLevel::Info, title, details));
}

pub fn print_warn(title: &str, details: &str) {
    println!("{}", format_message(CliLevel::Warn, title, details));
}

/// Errors go to stderr, details on their own line.
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{}", format_message(CliLevel::Error, title, ""));
    if let Some(details) = details {
        eprintln!("{}", format_message(CliLevel::Error, "Details:", details));
    }
}

pub fn print_success(title: &str, details: &str) {
    println!("{}", format_message(CliLevel::Success, title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
