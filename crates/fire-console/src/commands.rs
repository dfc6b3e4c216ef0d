//! One-shot query subcommands.

use std::error::Error;

use chrono::NaiveDateTime;
use sensor_history::{
    ActiveEvent, HistoryClient, HistoryQuery, Location, Page, SensorStats, Series, SignalKind,
    TimeWindow,
};
use tracing::info;

use crate::config::Config;

pub async fn history(
    config: &Config,
    kind: SignalKind,
    locations: Vec<Location>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    page: u32,
    page_size: u32,
) -> Result<(), Box<dyn Error>> {
    let client = HistoryClient::new(config.history_config())?;

    let mut query = HistoryQuery::new(kind)
        .with_window(TimeWindow::new(start, end))
        .with_page(page, page_size);
    for location in locations {
        query = query.with_location(location);
    }

    let series = client.fetch_series(&query).await?;
    if series.is_empty() {
        println!("No {kind} data for the selected locations.");
        return Ok(());
    }

    for s in &series {
        print!("{}", render_series(s));
    }
    info!(series = series.len(), "History query complete");
    Ok(())
}

pub async fn stats(config: &Config, kind: SignalKind) -> Result<(), Box<dyn Error>> {
    let client = HistoryClient::new(config.history_config())?;
    let stats = client.sensor_stats(kind).await?;
    print!("{}", render_stats(&stats));
    Ok(())
}

pub async fn fire_status(config: &Config, location: Location) -> Result<(), Box<dyn Error>> {
    let client = HistoryClient::new(config.history_config())?;
    let status = client.fire_status(location).await?;
    if status.fire {
        println!("{location}: FIRE");
    } else {
        println!("{location}: no fire");
    }
    Ok(())
}

pub async fn events(config: &Config, page: u32, page_size: u32) -> Result<(), Box<dyn Error>> {
    let client = HistoryClient::new(config.history_config())?;
    let events = client.active_events(page, page_size).await?;
    print!("{}", render_events(&events));
    Ok(())
}

fn render_series(series: &Series) -> String {
    let mut out = format!("{} ({} points)\n", series.label, series.points.len());
    for (timestamp, value) in &series.points {
        out.push_str(&format!(
            "  {}  {:.1} {}\n",
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            value,
            series.kind.unit()
        ));
    }
    out
}

fn render_stats(stats: &SensorStats) -> String {
    let unit = stats.sensor_type.unit();
    let list = |values: &[f64]| {
        values
            .iter()
            .map(|v| format!("{v:.1}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "{kind} statistics\n  min:   {min:.2} {unit}\n  max:   {max:.2} {unit}\n  range: {range:.2} {unit}\n  mean:  {mean:.2} {unit}\n  top 10 max: {top_max}\n  top 10 min: {top_min}\n",
        kind = stats.sensor_type,
        min = stats.min,
        max = stats.max,
        range = stats.range,
        mean = stats.mean,
        top_max = list(&stats.top10_max),
        top_min = list(&stats.top10_min),
    )
}

fn render_events(events: &Page<ActiveEvent>) -> String {
    if events.results.is_empty() {
        return "No active events.\n".to_string();
    }

    let mut out = format!(
        "Active events (page {}/{}, {} total)\n",
        events.page, events.total_pages, events.total_results
    );
    for event in &events.results {
        let ends = match event.ends_at() {
            Some(end) => end.format("%H:%M:%S").to_string(),
            None => "open-ended".to_string(),
        };
        out.push_str(&format!(
            "  {} in building {} floor {}, {} to {}\n",
            event.kind,
            event.building,
            event.floor,
            event.start_time.format("%H:%M:%S"),
            ends,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_stream::Building;
    use chrono::DateTime;

    #[test]
    fn test_render_series() {
        let series = Series {
            label: "Humidity - A Floor 2".to_string(),
            kind: SignalKind::Humidity,
            location: Location::new(Building::A, 2).unwrap(),
            points: vec![(
                DateTime::parse_from_rfc3339("2025-08-06T10:00:00+03:00").unwrap(),
                45.34,
            )],
        };
        assert_eq!(
            render_series(&series),
            "Humidity - A Floor 2 (1 points)\n  2025-08-06 10:00:00  45.3 %\n"
        );
    }

    #[test]
    fn test_render_stats() {
        let stats = SensorStats {
            sensor_type: SignalKind::Temperature,
            min: 18.0,
            max: 80.5,
            range: 62.5,
            mean: 24.125,
            top10_max: vec![80.5, 79.0],
            top10_min: vec![18.0],
        };
        let out = render_stats(&stats);
        assert!(out.starts_with("Temperature statistics\n"));
        assert!(out.contains("max:   80.50 °C"));
        assert!(out.contains("top 10 max: 80.5, 79.0"));
    }

    #[test]
    fn test_render_no_events() {
        assert_eq!(render_events(&Page::empty(1, 10)), "No active events.\n");
    }

    #[test]
    fn test_render_events() {
        let page = Page {
            page: 1,
            page_size: 10,
            total_results: 1,
            total_pages: 1,
            results: vec![ActiveEvent {
                kind: "fire".to_string(),
                building: "C".to_string(),
                floor: 4,
                start_time: DateTime::parse_from_rfc3339("2025-08-06T14:00:00+03:00").unwrap(),
                duration: 90,
            }],
        };
        assert_eq!(
            render_events(&page),
            "Active events (page 1/1, 1 total)\n  fire in building C floor 4, 14:00:00 to 14:01:30\n"
        );
    }

    #[test]
    fn test_render_event_without_end() {
        let mut page = Page::empty(1, 10);
        page.total_results = 1;
        page.total_pages = 1;
        page.results.push(ActiveEvent {
            kind: "fire".to_string(),
            building: "A".to_string(),
            floor: 2,
            start_time: DateTime::parse_from_rfc3339("2025-08-06T14:00:00+03:00").unwrap(),
            duration: i64::MAX,
        });
        assert!(render_events(&page).ends_with("14:00:00 to open-ended\n"));
    }
}
