//! Row parsers for CAM domain objects
//!
//! A required column that is absent fails with [`ParseError::MissingField`];
//! an empty cell is a present value and is passed through as-is.

use crate::error::ParseError;
use crate::models::{CamDevice, CamLocalUser, FilterType};
use crate::response::{FOUND_KEY, Row, is_truthy};

const MAC_KEY: &str = "mac";
const IP_KEY: &str = "ip";
const TYPE_KEY: &str = "type";
const ROLE_KEY: &str = "role";
const DESCRIPTION_KEY: &str = "desc";
const SERVER_IP_KEY: &str = "ssip";
const USER_NAME_KEY: &str = "name";
const VERSION_KEY: &str = "version";

fn required<'a>(row: &'a Row, key: &'static str) -> Result<&'a str, ParseError> {
    row.get(key).ok_or(ParseError::MissingField(key))
}

fn optional(row: &Row, key: &str) -> Option<String> {
    row.get(key).map(str::to_string)
}

/// Parse a Device Filters row
pub fn parse_device(row: &Row) -> Result<CamDevice, ParseError> {
    let mac_address = required(row, MAC_KEY)?;
    let raw_type = required(row, TYPE_KEY)?;
    let filter_type = raw_type
        .parse::<FilterType>()
        .map_err(|value| ParseError::InvalidValue { field: TYPE_KEY, value })?;

    Ok(CamDevice {
        mac_address: mac_address.to_string(),
        filter_type,
        ip_address: optional(row, IP_KEY),
        role: optional(row, ROLE_KEY),
        description: optional(row, DESCRIPTION_KEY),
        server_ip: optional(row, SERVER_IP_KEY),
    })
}

/// Parse every device row, skipping a leading marker row
pub fn parse_device_list(rows: &[Row]) -> Result<Vec<CamDevice>, ParseError> {
    data_rows(rows).iter().map(parse_device).collect()
}

/// Parse a local user row
pub fn parse_local_user(row: &Row) -> Result<CamLocalUser, ParseError> {
    Ok(CamLocalUser::new(
        required(row, USER_NAME_KEY)?,
        required(row, ROLE_KEY)?,
    ))
}

/// Parse every local user row, skipping a leading marker row
pub fn parse_local_user_list(rows: &[Row]) -> Result<Vec<CamLocalUser>, ParseError> {
    data_rows(rows).iter().map(parse_local_user).collect()
}

/// Read the `found` flag from row 0; absent means not found
pub fn parse_found_flag(rows: &[Row]) -> bool {
    rows.first()
        .and_then(|row| row.get(FOUND_KEY))
        .is_some_and(is_truthy)
}

/// Read the appliance version from row 0
pub fn parse_version(rows: &[Row]) -> Result<String, ParseError> {
    let row = rows.first().ok_or(ParseError::MissingRow(0))?;
    required(row, VERSION_KEY).map(str::to_string)
}

fn data_rows(rows: &[Row]) -> &[Row] {
    match rows.split_first() {
        Some((first, rest)) if first.is_marker() => rest,
        _ => rows,
    }
}
