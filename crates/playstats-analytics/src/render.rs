//! Renderers turning a report into bytes for the presentation layer.

use crate::report::DashboardReport;
use playstats_common::{format_minutes, truncate_display, Result};
use std::io::Write;

/// Something that can present a dashboard report.
pub trait ReportRenderer: Send + Sync {
    /// Writes the rendered report.
    fn render(&self, report: &DashboardReport, out: &mut dyn Write) -> Result<()>;

    /// Gets the name of this renderer.
    fn name(&self) -> &'static str;

    /// Gets the description of this renderer.
    fn description(&self) -> &'static str;

    /// Renders into a fresh buffer.
    fn render_to_vec(&self, report: &DashboardReport) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.render(report, &mut buffer)?;
        Ok(buffer)
    }
}

/// The full report as JSON, for charting front ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    /// Indent the output.
    pub pretty: bool,
}

impl JsonRenderer {
    /// Renderer with the given indentation choice.
    pub const fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &DashboardReport, out: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, report)?;
        } else {
            serde_json::to_writer(&mut *out, report)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Every report section as a JSON document"
    }
}

/// A short plain-text digest of the headline numbers.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRenderer {
    /// Longest artist or track name shown before truncation.
    pub max_name_width: usize,
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        Self { max_name_width: 40 }
    }
}

impl ReportRenderer for SummaryRenderer {
    fn render(&self, report: &DashboardReport, out: &mut dyn Write) -> Result<()> {
        let overview = &report.overview;
        let name = |s: &str| truncate_display(s, self.max_name_width);

        if let Some(criteria) = &report.criteria {
            writeln!(out, "Listening summary {} to {}", criteria.start, criteria.end)?;
        } else {
            writeln!(out, "Listening summary")?;
        }
        for warning in &report.warnings {
            writeln!(out, "warning: {warning}")?;
        }
        if report.is_empty() {
            return Ok(());
        }

        writeln!(
            out,
            "{} plays, {} tracks, {} artists, {} albums, {} listened",
            overview.total_plays,
            overview.distinct_tracks,
            overview.distinct_artists,
            overview.distinct_albums,
            format_minutes(overview.total_minutes)
        )?;

        if let Some(artist) = report.rankings.artists_by_plays.first() {
            writeln!(out, "Favourite artist: {} ({} plays)", name(&artist.artist), artist.plays)?;
        }
        if let Some(track) = report.rankings.tracks_by_plays.first() {
            writeln!(
                out,
                "Favourite track: {} by {} ({} plays)",
                name(&track.track),
                name(&track.artist),
                track.plays
            )?;
        }

        let peaks = &report.peaks;
        if let Some(hour) = peaks.busiest_hour {
            writeln!(out, "Busiest hour: {hour:02}:00")?;
        }
        if let Some(day) = peaks.busiest_weekday {
            writeln!(out, "Busiest day: {day}")?;
        }
        if let Some(bucket) = peaks.busiest_time_of_day {
            writeln!(out, "Busiest period: {}", bucket.label())?;
        }
        if let Some(date) = peaks.most_active_date {
            writeln!(out, "Most active date: {date} ({} plays)", peaks.most_active_date_plays)?;
        }

        let durations = &report.durations.summary;
        writeln!(
            out,
            "Average play {:.2} min, median {:.2} min",
            durations.mean_minutes, durations.median_minutes
        )?;
        writeln!(
            out,
            "Consistency {:.1}% over {} active days, artist diversity {:.3}, skip rate {:.1}%",
            report.habits.consistency * 100.0,
            overview.active_days,
            report.habits.diversity,
            report.habits.skips.skip_rate * 100.0
        )?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "summary"
    }

    fn description(&self) -> &'static str {
        "Plain-text digest of the headline numbers"
    }
}
