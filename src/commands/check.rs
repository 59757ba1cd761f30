use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use polycal_core::{Pipeline, TransformRegistry};

use crate::render::Render;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let registry = TransformRegistry::standard();

    for source in &config.sources {
        let pipeline = Pipeline::build(&source.transforms, registry)
            .with_context(|| format!("Invalid transforms for source {}", source.label()))?;

        println!("{}", source.render());
        if pipeline.is_empty() {
            println!("   {}", "(no transforms)".dimmed());
        }
        for (i, stage) in pipeline.stage_names().iter().enumerate() {
            println!("   {}. {}", i + 1, stage);
        }
    }

    println!(
        "\n{} {} source(s) into {}",
        "OK".green(),
        config.sources.len(),
        config.target.name
    );
    Ok(())
}
