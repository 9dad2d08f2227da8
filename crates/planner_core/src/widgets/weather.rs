//! Current-weather widget over an Open-Meteo style forecast response.

use crate::widgets::WidgetError;
use log::warn;
use serde::Deserialize;

pub const WEATHER_UNAVAILABLE: &str = "Weather unavailable";

/// Host-provided transport for the geolocation-keyed forecast endpoint.
pub trait WeatherSource {
    /// Returns the raw JSON response body for the given coordinates.
    fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<String, WidgetError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub weather_code: u16,
    pub description: &'static str,
    pub humidity_percent: Option<f64>,
    /// Precipitation probability for the first forecast hour.
    pub precipitation_probability: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    Current(WeatherSnapshot),
    Unavailable,
}

impl WeatherReport {
    /// One-line widget text, e.g. `12°C, Partly cloudy`.
    pub fn summary(&self) -> String {
        match self {
            Self::Current(snapshot) => format!(
                "{:.0}°C, {}",
                snapshot.temperature_c, snapshot.description
            ),
            Self::Unavailable => WEATHER_UNAVAILABLE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ForecastBody {
    current: Option<CurrentBlock>,
    #[serde(default)]
    hourly: Option<HourlyBlock>,
    #[serde(default)]
    daily: Option<DailyBlock>,
}

#[derive(Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    weather_code: Option<u16>,
    #[serde(default)]
    relative_humidity_2m: Option<f64>,
}

#[derive(Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct DailyBlock {
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
}

pub fn parse_forecast(body: &str) -> Result<WeatherSnapshot, WidgetError> {
    let forecast: ForecastBody = serde_json::from_str(body)?;
    let current = forecast
        .current
        .ok_or(WidgetError::MissingField("current"))?;
    let temperature_c = current
        .temperature_2m
        .ok_or(WidgetError::MissingField("current.temperature_2m"))?;
    let weather_code = current
        .weather_code
        .ok_or(WidgetError::MissingField("current.weather_code"))?;
    let precipitation_probability = forecast
        .hourly
        .and_then(|hourly| hourly.precipitation_probability.into_iter().next().flatten());
    let (sunrise, sunset) = match forecast.daily {
        Some(daily) => (
            daily.sunrise.into_iter().next(),
            daily.sunset.into_iter().next(),
        ),
        None => (None, None),
    };

    Ok(WeatherSnapshot {
        temperature_c,
        weather_code,
        description: describe_weather_code(weather_code),
        humidity_percent: current.relative_humidity_2m,
        precipitation_probability,
        sunrise,
        sunset,
    })
}

/// Fetches current weather, reporting `Unavailable` on any failure.
pub fn load_weather(source: &dyn WeatherSource, latitude: f64, longitude: f64) -> WeatherReport {
    match source
        .fetch_forecast(latitude, longitude)
        .and_then(|body| parse_forecast(&body))
    {
        Ok(snapshot) => WeatherReport::Current(snapshot),
        Err(err) => {
            warn!("event=weather_refresh module=widgets status=error error_code=weather_fallback error={err}");
            WeatherReport::Unavailable
        }
    }
}

/// Short description of a WMO weather interpretation code.
pub fn describe_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 | 77 => "Snow",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
