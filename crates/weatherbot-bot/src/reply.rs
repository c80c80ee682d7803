//! Outbound message texts and reply formatting.

use weatherbot_weather::WeatherReport;

pub const HELP_TEXT: &str = "Use /start to view a menu of this bot. \
Use /help to get help for using this bot. \
Use /find or the \"Find city\" button to look up the weather in a city.";

pub const FIND_PROMPT: &str = "Input the name of the city:";

pub const NOT_FOUND_TEXT: &str = "Can't find this city.";

pub const FIND_FIRST_HINT: &str = "Press \"Find city\" first, or use /start to open the menu.";

/// Text shown in place of the menu message after a button press.
pub fn selected_option(payload: &str) -> String {
    format!("Selected option: {}", payload)
}

/// Render a lookup result, e.g. `Temperature: 10.15 °C. Clear sky`.
pub fn format_reply(report: &WeatherReport) -> String {
    format!(
        "Temperature: {:.2} °C. {}",
        report.temperature_celsius(),
        capitalize(&report.description)
    )
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
