mod commands;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::{
    Args, ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, Style},
    },
    error::ErrorKind,
};

use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use std::fmt::Write;
use std::io::{self, Write as IoWrite};

use blogdb::config::{DEFAULT_DATABASE, DEFAULT_URI};
use commands::{
    init::{InitArgs, handle_init},
    status::handle_status,
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("MONGODB_URI", "MongoDB connection string (default mongodb://localhost:27017)"),
    ("BLOGDB_DATABASE", "Database to prepare (default blog_platform)"),
    ("RUST_LOG", "Log filter for diagnostic output, e.g. blogdb=debug"),
];

#[derive(Parser)]
#[command(name = "blogdb")]
#[command(version)]
#[command(
    about = "Prepare the blog platform MongoDB database",
    long_about = r#"Bootstrap tool for the blog platform database that:

• Creates the nine platform collections if they are missing
• Creates unique, sort, compound, text-search, and TTL indexes
• Inserts the default categories and tags once

Every step is idempotent: re-running against a prepared database changes nothing.
Running without a command is the same as 'blogdb init'.

Commands:
  init      Create collections, indexes, and seed rows
  status    Show which collections, indexes, and seed rows exist
"#
)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to connect. Read from the environment unless given on the command line.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", default_value = DEFAULT_URI, hide_env_values = true, global = true)]
    pub uri: String,

    /// Database to prepare
    #[arg(long, env = "BLOGDB_DATABASE", default_value = DEFAULT_DATABASE, global = true)]
    pub database: String,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let command = build_cli_command();
        match command.styles(help_styles()).try_get_matches() {
            Ok(matches) => Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit()),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = print_blank_line_stdout();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display help: {print_err}");
                    }
                    let _ = print_blank_line_stdout();
                    std::process::exit(0);
                }
                _ => {
                    let exit_code = err.exit_code();
                    let _ = print_blank_line_stderr();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display error: {print_err}");
                    }
                    let _ = print_blank_line_stderr();
                    std::process::exit(exit_code);
                }
            },
        }
    }
}

fn build_cli_command() -> Command {
    let use_color = detect_color_support();
    let appendix = render_top_level_appendix(use_color);
    let mut command = Cli::command().after_long_help(appendix);
    command = command.color(if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    });
    attach_command_examples(&mut command, use_color);
    command
}

fn attach_command_examples(command: &mut Command, use_color: bool) {
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            let help_text = render_examples(example.groups, use_color);
            *subcommand = subcommand.clone().after_long_help(help_text);
        }
    }
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let heading = stylize("Examples:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{heading}");

    for (index, group) in groups.iter().enumerate() {
        let title = stylize(group.title, theme.primary, true, use_color);
        let _ = writeln!(buffer, "  {title}");

        for command in group.commands {
            let arrow = stylize(ICONS.arrow, theme.secondary, false, use_color);
            let command_text = stylize(command, theme.secondary, false, use_color);
            let _ = writeln!(buffer, "    {arrow} {command_text}");
        }

        if index + 1 < groups.len() {
            buffer.push('\n');
        }
    }

    buffer
}

fn render_top_level_appendix(use_color: bool) -> String {
    let theme = &THEME;
    let mut buffer = String::new();

    let env_heading = stylize("Environment Variables:", theme.highlight, true, use_color);
    let _ = writeln!(buffer, "{env_heading}");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let key_text = stylize(key, theme.key, true, use_color);
        let value_text = stylize(description, theme.value, false, use_color);
        let _ = writeln!(buffer, "  {key_text}  {value_text}");
    }

    buffer.push('\n');

    let tip_heading = stylize("Tip:", theme.highlight, true, use_color);
    let tip_text = stylize(
        "Use 'blogdb <command> --help' to view examples for each command.",
        theme.secondary,
        false,
        use_color,
    );
    let _ = writeln!(buffer, "{tip_heading} {tip_text}");

    buffer
}

fn print_blank_line_stdout() -> io::Result<()> {
    blank_line(&mut io::stdout())
}

fn print_blank_line_stderr() -> io::Result<()> {
    blank_line(&mut io::stderr())
}

fn blank_line(out: &mut impl IoWrite) -> io::Result<()> {
    out.write_all(b"\n")?;
    out.flush()
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, false) => text.color(color).to_string(),
        (true, true) => text.color(color).bold().to_string(),
    }
}

fn detect_color_support() -> bool {
    ShouldColorize::from_env().should_colorize()
}

/// Help colors follow the CLI theme.
fn help_styles() -> Styles {
    let theme = &THEME;
    let fg = |color| Style::new().fg_color(Some(ClapColor::Ansi(ansi(color))));
    Styles::styled()
        .usage(fg(theme.primary).bold())
        .header(fg(theme.highlight).bold())
        .literal(fg(theme.secondary))
        .placeholder(fg(theme.muted))
        .valid(fg(theme.success))
        .invalid(fg(theme.warning))
        .error(fg(theme.error).bold())
}

/// The theme only uses the basic palette; anything else renders as plain white.
fn ansi(color: ThemeColor) -> AnsiColor {
    match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing collections, indexes, and default rows
    Init(InitArgs),

    /// Show which collections, indexes, and default rows exist
    Status,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse_with_styles();

    let _ = print_blank_line_stdout();

    match execute(cli).await {
        Ok(()) => {
            let _ = print_blank_line_stdout();
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            let _ = print_blank_line_stdout();
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    let output = OutputManager::new(global_options);

    match cli.command.unwrap_or(Commands::Init(InitArgs::default())) {
        Commands::Init(args) => {
            handle_init(args, &cli.target, &output).await?;
        }
        Commands::Status => {
            handle_status(&cli.target, &output).await?;
        }
    }

    Ok(())
}
