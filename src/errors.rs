use chrono::NaiveDate;
use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_client_error!(WriteError, "Error writing file.");

// Parsing-related.
define_client_error!(InvalidCsv, "Invalid CSV format.");
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidDate, "Invalid date (expected dd/mm/yyyy): '{date}'.", { date: &str });
define_client_error!(InvalidFeeAmount, "Invalid fee amount: '{value}'.", { value: &str });

// Configuration-related.
define_client_error!(
    InvalidSplitRule,
    "Invalid split rule: consejo ({consejo_pct}) and engineer ({engineer_pct}) percentages must be non-negative and sum to 1.",
    { consejo_pct: f64, engineer_pct: f64 }
);
define_client_error!(
    InvalidEngineerRouting,
    "Invalid engineer routing: {details}.",
    { details: &str }
);

// Period-related.
define_client_error!(
    InvalidDateRange,
    "Invalid date range: start ({start}) is after end ({end}).",
    { start: &NaiveDate, end: &NaiveDate }
);
define_client_error!(InvalidMonth, "Invalid month: {month}/{year}.", { month: u32, year: i32 });

// Record store.
define_client_error!(RecordNotFound, "Work record not found: #{id}.", { id: u64 });
define_client_error!(
    UnknownRecordField,
    "Unknown work record field: '{field}'.",
    { field: &str }
);

// Reporting.
define_internal_error!(
    ReportExportFailed,
    "Failed to export analysis report to '{path}'.",
    { path: &str }
);
