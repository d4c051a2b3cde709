//! Compile an edit into its filter chain and argument list.

use std::path::PathBuf;

use cropkit_edit_core::EditStore;
use cropkit_edit_model::human_time;
use cropkit_render_engine::{compile, probe_video};

use crate::EditArgs;

pub fn run(input: PathBuf, edit: EditArgs, json: bool) -> anyhow::Result<()> {
    let meta = probe_video(&input)
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", input.display()))?;

    let mut store = EditStore::new(meta);
    super::apply_edit(&mut store, &edit)?;
    tracing::debug!(transform = ?store.transform(), "Edit state committed");

    let plan = compile(store.transform(), store.meta());

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Source: {meta}");
    println!(
        "Output duration: {} ({:.3}s)",
        human_time(plan.output_duration_secs),
        plan.output_duration_secs
    );
    println!();

    if plan.filters.is_empty() {
        println!("Filters: (none)");
    } else {
        println!("Filters:");
        for filter in &plan.filters {
            println!("  {filter}");
        }
    }
    println!();

    println!("Arguments:");
    println!("  {}", plan.args.join(" "));

    Ok(())
}
