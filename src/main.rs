//! Command-line entry point.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use email_template_builder::TemplateBuilder;
use email_template_builder::config::{
    ConfigManager,
    SettingsOverrides,
};
use email_template_builder::report::write_report;

/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "email-template-builder",
    version,
    about = "Build size-limited, translated HTML email templates"
)]
struct Cli {
    /// Directory holding the template, translations and output.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Settings file. Defaults to `.template-build.json` in `--dir`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language to build; repeat for several.
    #[arg(short, long = "lang", value_name = "LANG")]
    languages: Vec<String>,

    /// Output file name; `{lang}` is replaced by the language code.
    #[arg(short, long)]
    output: Option<String>,

    /// Character limit of the template editor.
    #[arg(long, value_name = "CHARS")]
    limit: Option<usize>,

    /// Exit with an error when an output exceeds the limit.
    #[arg(long)]
    fail_on_overflow: bool,
}

impl Cli {
    /// Settings given on the command line.
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            languages: self.languages.clone(),
            output_file: self.output.clone(),
            size_limit: self.limit,
            fail_on_overflow: self.fail_on_overflow,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(&cli.dir, cli.config.as_deref())?;
    config_manager.apply_overrides(&cli.overrides())?;

    let builder = TemplateBuilder::new(&cli.dir, config_manager.get_settings().clone());
    let outcome = builder.build()?;

    write_report(&mut io::stdout().lock(), &outcome.artifacts)?;

    if builder.settings().fail_on_overflow {
        outcome.check_limits()?;
    }

    Ok(())
}
