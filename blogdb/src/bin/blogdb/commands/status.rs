use anyhow::{Context, Result};
use comfy_table::Cell;

use blogdb::{SchemaStatus, inspect};

use crate::TargetArgs;
use crate::commands::connect;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;
use crate::theme::ICONS;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Inspect",
    commands: &[
        "blogdb status                            # Show collections, indexes, and seed rows",
        "MONGODB_URI=mongodb://db:27017 blogdb status",
    ],
}];

pub async fn handle_status(target: &TargetArgs, output: &OutputManager) -> Result<()> {
    let mut store = connect(target, output).await?;

    output.progress("Inspecting database");
    let status = inspect(&mut store).await;
    output.clear_line();
    let status = status.context("Failed to inspect database")?;

    print_status(&status, output);
    Ok(())
}

fn print_status(status: &SchemaStatus, output: &OutputManager) {
    output.heading("Collections");

    let mut table = output.create_table();
    output.add_table_header(&mut table, &["Collection", "Exists", "Indexes", "Missing"]);
    for collection in &status.collections {
        let total = collection.indexes_present.len() + collection.indexes_missing.len();
        table.add_row(vec![
            Cell::new(collection.name),
            Cell::new(if collection.exists { ICONS.success } else { ICONS.error }),
            Cell::new(format!("{}/{total}", collection.indexes_present.len())),
            Cell::new(collection.indexes_missing.join(", ")),
        ]);
    }
    output.table(&table);

    output.heading("Seed Data");
    for seed in &status.seeds {
        let line = format!("{}: {}", seed.collection, seed.name);
        if seed.present {
            output.success(&line);
        } else {
            output.warning(&format!("{line} (missing)"));
        }
    }

    if status.is_complete() {
        output.success("Database matches the expected layout");
    } else {
        output.warning(&format!(
            "{} item(s) missing; run 'blogdb init' to create them",
            status.missing_count()
        ));
    }
}
