use crate::metadata::{CaptureTimestamp, DateRange};
use crate::title::{extract_title, title_extension};
use chrono::{Datelike, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// Formatting knobs for composed names.
///
/// `time_separator` and `date_time_separator` only apply to files, `range_separator`
/// and `day_start` only to directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingOptions {
    pub date_separator: String,
    pub time_separator: String,
    pub date_time_separator: String,
    pub range_separator: String,
    /// Hour (0-23) at which a new day begins; earlier captures count for the previous day.
    pub day_start: u32,
    pub include_title: bool,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            date_separator: ".".to_string(),
            time_separator: ".".to_string(),
            date_time_separator: "_".to_string(),
            range_separator: "-".to_string(),
            day_start: 0,
            include_title: true,
        }
    }
}

/// `<date><dts><time><title>`, e.g. `2016.01.01_00.00.00 blah.jpg`.
///
/// With `include_title` off only the extension of the old name survives.
pub fn make_new_file_name(old_name: &str, date: CaptureTimestamp, options: &NamingOptions) -> String {
    let ds = &options.date_separator;
    let ts = &options.time_separator;
    let mut name = format!(
        "{:04}{ds}{:02}{ds}{:02}{}{:02}{ts}{:02}{ts}{:02}",
        date.year(),
        date.month(),
        date.day(),
        options.date_time_separator,
        date.hour(),
        date.minute(),
        date.second()
    );

    let title = joined_title(old_name);
    if options.include_title {
        name.push_str(&title);
    } else {
        name.push_str(title_extension(&title));
    }
    name
}

/// `<start><rs><end><title>`, where the end date drops the year and month it shares
/// with the start, and disappears entirely when both fall on the same day.
pub fn make_new_dir_name(old_name: &str, range: DateRange, options: &NamingOptions) -> String {
    let ds = &options.date_separator;
    let start = attributed_day(range.start(), options.day_start);
    let end = attributed_day(range.end(), options.day_start);

    let mut name = format!(
        "{:04}{ds}{:02}{ds}{:02}",
        start.year(),
        start.month(),
        start.day()
    );

    if start != end {
        name.push_str(&options.range_separator);
        if end.year() != start.year() {
            name.push_str(&format!("{:04}{ds}", end.year()));
        }
        if end.year() != start.year() || end.month() != start.month() {
            name.push_str(&format!("{:02}{ds}", end.month()));
        }
        name.push_str(&format!("{:02}", end.day()));
    }

    if options.include_title {
        name.push_str(&joined_title(old_name));
    }
    name
}

fn attributed_day(date: CaptureTimestamp, day_start: u32) -> NaiveDate {
    let day = date.date_naive();
    if date.hour() < day_start {
        day.pred_opt().unwrap_or(day)
    } else {
        day
    }
}

// A title starting with a letter or digit would fuse with the date, so it gets a space.
fn joined_title(old_name: &str) -> String {
    let title = extract_title(old_name);
    match title.chars().next() {
        Some(first) if first.is_alphanumeric() => format!(" {title}"),
        _ => title,
    }
}
