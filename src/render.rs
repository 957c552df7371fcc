//! Plain-text rendering of model state.

use owl_core::LoadState;
use owl_ui::{ForecastModel, SearchModel};
use owl_weather::{AreaForecast, Units};

pub fn suggestions(model: &SearchModel) -> String {
    if model.suggestions().is_empty() {
        return "  (no suggestions)".to_string();
    }
    model
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, place)| format!("  {}. {}", i + 1, place.display_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn forecast_status(model: &ForecastModel, units: Units) -> String {
    match model.state() {
        LoadState::Idle => String::new(),
        LoadState::Loading => "Loading forecast...".to_string(),
        LoadState::Loaded => model
            .area_forecast()
            .map(|area| area_forecast(area, units))
            .unwrap_or_default(),
        LoadState::Empty => "No forecast is available for this area.".to_string(),
        LoadState::Error => model
            .error_message()
            .unwrap_or("Something went wrong. Please try again.")
            .to_string(),
    }
}

pub fn area_forecast(area: &AreaForecast, units: Units) -> String {
    let f = &area.forecast;
    let deg = units.temperature_suffix();
    let condition = f.condition();

    let mut lines = vec![
        area.location.display_string(),
        format!(
            "  {} ({}), {:.0}{deg}, feels like {:.0}{deg}",
            condition.description(),
            f.description(),
            f.main.temp,
            f.main.feels_like,
        ),
        format!(
            "  High {:.0}{deg} / Low {:.0}{deg}, humidity {:.0}%, clouds {:.0}%",
            f.main.temp_max, f.main.temp_min, f.main.humidity, f.clouds.all,
        ),
        format!("  Wind {:.1} at {}°", f.wind.speed, f.wind.deg),
    ];

    if let Some(rain) = f.rain.as_ref().and_then(|r| r.one_hour) {
        lines.push(format!("  Rain {:.1} mm in the last hour", rain));
    }
    if let Some(snow) = f.snow.as_ref().and_then(|s| s.one_hour) {
        lines.push(format!("  Snow {:.1} mm in the last hour", snow));
    }
    if let (Some(rise), Some(set)) = (f.sunrise(), f.sunset()) {
        lines.push(format!(
            "  Sunrise {} UTC, sunset {} UTC",
            rise.format("%H:%M"),
            set.format("%H:%M")
        ));
    }

    lines.join("\n")
}
