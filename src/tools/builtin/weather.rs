//! Weather tool with canned readings for a handful of cities.

use async_trait::async_trait;

use crate::tools::tool::{Tool, ToolError};

const READINGS: &[(&str, &str)] = &[
    ("london", "15°C, Cloudy"),
    ("delhi", "32°C, Sunny"),
    ("nyc", "20°C, Rain"),
];

/// Canned current-weather lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weather;

#[async_trait]
impl Tool for Weather {
    fn name(&self) -> &str {
        "Weather"
    }

    fn description(&self) -> &str {
        "Get current weather for a city. Input should be the city name."
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let city = input.to_lowercase();
        let reading = READINGS
            .iter()
            .find(|(name, _)| city.contains(name))
            .map(|(_, reading)| *reading)
            .unwrap_or("Unknown city");
        Ok(reading.to_string())
    }
}
