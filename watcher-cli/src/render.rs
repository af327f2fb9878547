use chrono::{DateTime, TimeZone, Utc};
use std::{fmt::Display, io::Write};
use watcher_core::WeatherReport;

/// Write a human-readable report to `out`, with sunrise/sunset shown in `tz`.
pub fn render_report<W, Tz>(out: &mut W, report: &WeatherReport, tz: &Tz) -> std::io::Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(out, "{}", report.display_name())?;
    if let Some(url) = report.icon_url() {
        writeln!(out, "Icon: {url}")?;
    }
    writeln!(out, "{}", report.description.to_uppercase())?;
    writeln!(
        out,
        "Temp: {}°C (min: {}°C, max: {}°C)",
        report.temperature_c, report.temp_min_c, report.temp_max_c
    )?;
    writeln!(out, "Wind: {} m/s", report.wind_speed_mps)?;

    if let Some(sunrise) = report.sunrise {
        writeln!(out, "Sunrise: {}", local_time(sunrise, tz))?;
    }
    if let Some(sunset) = report.sunset {
        writeln!(out, "Sunset: {}", local_time(sunset, tz))?;
    }

    Ok(())
}

fn local_time<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%H:%M:%S").to_string()
}
