use anyhow::Result;
use clap::Args;

use blogdb::{
    Action, COLLECTIONS, DEFAULT_CATEGORIES, DEFAULT_TAGS, InitReport, Initializer, Outcome, Phase,
    Progress,
};

use crate::commands::connect;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;
use crate::theme::ICONS;
use crate::TargetArgs;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Prepare a Database",
        commands: &[
            "blogdb                                   # Same as 'blogdb init' against the default target",
            "blogdb init                              # Create collections, indexes, and seed rows",
            "blogdb --database blog_staging init      # Target another database",
        ],
    },
    ExampleGroup {
        title: "Preview",
        commands: &["blogdb init --dry-run                    # Report what is missing without writing"],
    },
];

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Inspect the database and report what would be created, without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Prints each outcome as the initializer produces it.
struct ProgressPrinter<'a> {
    output: &'a OutputManager,
}

impl Progress for ProgressPrinter<'_> {
    fn phase_started(&mut self, phase: Phase) {
        let heading = match phase {
            Phase::Collections => "Collections",
            Phase::Indexes => "Indexes",
            Phase::Seeds => "Seed Data",
        };
        self.output.heading(heading);
    }

    fn record(&mut self, outcome: &Outcome) {
        let (noun, label) = match outcome.phase {
            Phase::Collections => ("collection", "Collection"),
            Phase::Indexes => ("index", "Index"),
            Phase::Seeds => ("row", "Row"),
        };
        let target = &outcome.target;

        match &outcome.action {
            Action::Created if outcome.phase == Phase::Seeds => {
                self.output.success(&format!("Inserted {target}"))
            }
            Action::Created => self.output.success(&format!("Created {noun} {target}")),
            Action::AlreadyPresent => self.output.info(&format!("{label} already exists: {target}")),
            Action::Ensured => self.output.info(&format!("{label} ensured (could not check beforehand): {target}")),
            Action::WouldCreate => self.output.indented(ICONS.plus, &format!("Would create {noun} {target}")),
            Action::Failed(reason) => self.output.error(&format!("Failed {noun} {target}: {reason}")),
        }
    }
}

pub async fn handle_init(args: InitArgs, target: &TargetArgs, output: &OutputManager) -> Result<()> {
    let store = connect(target, output).await?;

    let mut initializer = Initializer::new(store).with_dry_run(args.dry_run);
    if args.dry_run {
        output.warning("DRY RUN MODE - No changes will be made");
    }

    let mut printer = ProgressPrinter { output };
    let report = initializer.run(&mut printer).await;

    print_summary(&report, output);
    Ok(())
}

fn print_summary(report: &InitReport, output: &OutputManager) {
    output.heading("Summary");

    let created_header = if report.dry_run { "Would create" } else { "Created" };
    let mut table = output.create_table();
    output.add_table_header(
        &mut table,
        &["Phase", created_header, "Already present", "Unverified", "Failed"],
    );

    for phase in [Phase::Collections, Phase::Indexes, Phase::Seeds] {
        let created = if report.dry_run {
            report.count(phase, &Action::WouldCreate)
        } else {
            report.count(phase, &Action::Created)
        };
        table.add_row(vec![
            phase.to_string(),
            created.to_string(),
            report.count(phase, &Action::AlreadyPresent).to_string(),
            report.count(phase, &Action::Ensured).to_string(),
            report.failures_in(phase).to_string(),
        ]);
    }
    output.table(&table);

    output.bullet(&format!("Collections: {}", COLLECTIONS.len()));
    output.bullet(&format!("Default categories: {}", DEFAULT_CATEGORIES.len()));
    output.bullet(&format!("Default tags: {}", DEFAULT_TAGS.len()));

    let failures = report.failure_count();
    if failures > 0 {
        output.warning(&format!(
            "Completed with {failures} failure(s); see the messages above"
        ));
    } else if report.dry_run {
        output.success("Dry run complete");
    } else {
        output.success("Blog platform database is ready");
    }
}
