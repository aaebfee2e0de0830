/// Utilities for date and time values exchanged with the backend
///
/// The backend answers ISO timestamps ("2024-03-15T00:00:00.000Z") and
/// clock values with seconds ("14:02:26"); form inputs want "2024-03-15"
/// and "14:02".

/// Date part of an ISO datetime string
/// Example: "2024-03-15T14:02:26.123Z" -> "2024-03-15"
pub fn date_part(datetime_str: &str) -> &str {
    datetime_str.split('T').next().unwrap_or(datetime_str)
}

/// Clock value truncated to hours and minutes
/// Example: "14:02:26" -> "14:02"
pub fn clock_hh_mm(time_str: &str) -> String {
    time_str.chars().take(5).collect()
}

/// Format ISO date string to DD/MM/YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15/03/2024"
pub fn format_date(date_str: &str) -> String {
    let date = date_part(date_str);
    if let Some((year, rest)) = date.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}/{}/{}", day, month, year);
        }
    }
    date_str.to_string()
}
