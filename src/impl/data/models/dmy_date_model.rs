use std::str::FromStr;

use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::errors::InvalidDate;

/// Day-first date as written in the records sheet (`dd/mm/yyyy`).
#[derive(Debug)]
pub(crate) struct DmyDateModel(NaiveDate);
impl FromStr for DmyDateModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let d = NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y")
            .map_err(|e| InvalidDate::with_debug(s, &e))?;
        Ok(DmyDateModel(d))
    }
}

impl Into<NaiveDate> for DmyDateModel {
    fn into(self) -> NaiveDate {
        self.0
    }
}
