//! Colored terminal rendering for polycal types.

use chrono::TimeDelta;
use owo_colors::OwoColorize;
use polycal_core::{BatchReport, Event, SourceSpec, SyncBatch, SyncWindow};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = format!("{} - {}", self.start, self.end);
        if self.deleted {
            format!("{} {} {}", "-".red(), self.uid.red(), time.dimmed())
        } else {
            let title = self.title.as_deref().unwrap_or("(untitled)");
            format!("{} {} {}", "+".green(), title.green(), time.dimmed())
        }
    }
}

impl Render for SyncWindow {
    fn render(&self) -> String {
        let last_day = self.end - TimeDelta::days(1);
        format!("{} to {}", self.start.format("%Y-%m-%d"), last_day.format("%Y-%m-%d"))
    }
}

impl Render for SourceSpec {
    fn render(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", name, format!("({})", self.id).dimmed()),
            None => self.id.clone(),
        }
    }
}

impl Render for SyncBatch {
    fn render(&self) -> String {
        if self.is_empty() {
            return format!("   {}", "Up to date".dimmed());
        }
        self.iter()
            .map(|event| format!("   {}", event.render()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for BatchReport {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "Synced: {} imported, {} deleted",
            self.imported, self.deleted
        )];
        for failure in &self.failures {
            lines.push(format!(
                "   {} {} ({}): {}",
                "!".red(),
                failure.uid,
                failure.operation,
                failure.error.red()
            ));
        }
        lines.join("\n")
    }
}
