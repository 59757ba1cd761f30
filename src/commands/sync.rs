use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use polycal_core::{Processor, Provider, SyncWindow};

use crate::render::Render;
use crate::utils::tui;

pub async fn run(config_path: Option<&Path>, month: Option<&str>, dry_run: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let window = match month {
        Some(month) => SyncWindow::parse_month(month)?,
        None => SyncWindow::current_month(),
    };

    let provider = Provider::new(&config.provider, &config.user_agent);
    let processor = Processor::new(&config, &provider);
    let header = format!("📅 {} ({})", config.target.name, window.render());

    if dry_run {
        let spinner = tui::create_spinner(header.clone())?;
        let result = processor.plan(&window).await;
        spinner.finish_and_clear();

        println!("{}", header);
        let batch = result?;
        println!("{}", batch.render());
        if !batch.is_empty() {
            println!("\n{}", "Dry run: nothing was written".dimmed());
        }
        return Ok(());
    }

    let spinner = tui::create_spinner(header.clone())?;
    let result = processor.sync(&window).await;
    spinner.finish_and_clear();

    println!("{}", header);
    let outcome = result?;
    println!("{}", outcome.batch.render());
    if outcome.batch.is_empty() {
        return Ok(());
    }

    println!("\n{}", outcome.report.render());
    if !outcome.report.is_success() {
        bail!(
            "{} of {} changes failed",
            outcome.report.failures.len(),
            outcome.batch.len()
        );
    }
    Ok(())
}
