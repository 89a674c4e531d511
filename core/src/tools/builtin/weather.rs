//! Dummy weather lookup tool

use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::Tool;
use async_trait::async_trait;
use rand::Rng;

/// The fixed set of canned conditions the tool picks from
const WEATHER_CONDITIONS: &[(&str, i32)] = &[("Rainy", 15), ("Clear", 25), ("Windy", 20)];

/// Returns canned weather data for a location.
///
/// This is a deliberate stub: the condition is picked uniformly at random
/// from a fixed table and never consults a real service.
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather_info"
    }

    fn description(&self) -> &str {
        "Fetches dummy weather information for a given location."
    }

    fn argument_name(&self) -> &str {
        "location"
    }

    fn argument_description(&self) -> &str {
        "The location to fetch weather information for"
    }

    async fn invoke(&self, argument: &str) -> Result<String> {
        let index = rand::thread_rng().gen_range(0..WEATHER_CONDITIONS.len());
        let (condition, temp_c) = WEATHER_CONDITIONS[index];
        Ok(format!(
            "Weather in {}: {}, {}°C",
            argument, condition, temp_c
        ))
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool_factory!(
    WeatherToolFactory,
    WeatherTool,
    "get_weather_info",
    "Fetches dummy weather information for a given location."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn report_names_the_location_and_a_known_condition() {
        let report = WeatherTool::new().invoke("Hanoi").await.unwrap();

        assert!(report.starts_with("Weather in Hanoi: "));
        let expected = [
            "Weather in Hanoi: Rainy, 15°C",
            "Weather in Hanoi: Clear, 25°C",
            "Weather in Hanoi: Windy, 20°C",
        ];
        assert!(
            expected.contains(&report.as_str()),
            "unexpected report: {}",
            report
        );
    }

    #[tokio::test]
    async fn every_condition_pairs_with_its_temperature() {
        // Draw enough samples that mismatched condition/temperature pairs
        // would show up.
        let tool = WeatherTool::new();
        for _ in 0..50 {
            let report = tool.invoke("Oslo").await.unwrap();
            let suffix = report.strip_prefix("Weather in Oslo: ").unwrap();
            assert!(
                ["Rainy, 15°C", "Clear, 25°C", "Windy, 20°C"].contains(&suffix),
                "unexpected pair: {}",
                suffix
            );
        }
    }
}
