use iso8601::{Date, DateTime, Time};
use xml::escape::escape_str_pcdata;

use std::borrow::Cow;

/// Escapes text for use as XML character data.
///
/// The result is not safe inside attributes. XML-RPC has none.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    escape_str_pcdata(s)
}

/// Formats a date/time the way XML-RPC servers expect: `YYYYMMDDTHH:MM:SS`, plus fractional
/// seconds and offset so that the value survives a round trip.
pub fn format_datetime(date_time: &DateTime) -> String {
    let Time {
        hour, minute, second, millisecond, tz_offset_hours, tz_offset_minutes
    } = date_time.time;

    match date_time.date {
        Date::YMD { year, month, day } => {
            format!("{:04}{:02}{:02}T{:02}:{:02}:{:02}.{:03}{:+03}:{:02}",
                year, month, day,
                hour, minute, second, millisecond,
                tz_offset_hours, tz_offset_minutes.abs()
            )
        }
        Date::Week { year, ww, d } => format!("{:04}-W{:02}-{}", year, ww, d),
        Date::Ordinal { year, ddd } => format!("{:04}-{:03}", year, ddd),
    }
}
