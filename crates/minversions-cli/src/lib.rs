use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Args, Parser, Subcommand};
use pep508_rs::ExtraName;

use minversions_static::EnvVars;

fn extra_name_with_clap_error(arg: &str) -> Result<ExtraName> {
    ExtraName::from_str(arg).map_err(|_err| {
        anyhow!(
            "Extra names must start and end with a letter or digit and may only \
            contain -, _, ., and alphanumeric characters"
        )
    })
}

// Configures Clap v3-style help menu colors
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser)]
#[command(name = "minversions", author, version)]
#[command(about = "Test Python packages against the minimum versions of their dependencies.")]
#[command(propagate_version = true)]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Global options", next_display_order = 1000)]
pub struct GlobalArgs {
    /// Do not print any output.
    #[arg(global = true, long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use verbose output.
    ///
    /// You can configure fine-grained logging using the `RUST_LOG` environment variable.
    /// (<https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives>)
    ///
    /// From `-vvv` onwards, `-v` flags are also passed to `pip`.
    #[arg(global = true, action = clap::ArgAction::Count, long, short, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Control colors in output.
    #[arg(
        global = true,
        long,
        value_enum,
        default_value = "auto",
        value_name = "COLOR_CHOICE"
    )]
    pub color: ColorChoice,

    /// The path to a `minversions.toml` file to use for configuration.
    #[arg(global = true, long, env = EnvVars::MINVERSIONS_CONFIG_FILE)]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, clap::ValueEnum)]
pub enum ColorChoice {
    /// Enables colored output only when the output is going to a terminal or TTY with support.
    Auto,

    /// Enables colored output regardless of the detected environment.
    Always,

    /// Disables colored output.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the dependencies of a source distribution, rewritten to their minimum versions.
    ///
    /// Requirements that don't apply to the target environment are omitted; requirements
    /// without a lower bound are printed as written.
    Requirements(RequirementsArgs),

    /// Prepare test environments, installing the minimum versions of the package's dependencies
    /// when requested.
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RequirementsArgs {
    /// The source distribution (`.tar.gz`) to read metadata from.
    #[arg(long)]
    pub package: PathBuf,

    /// Include requirements gated on the given extra.
    ///
    /// May be provided more than once.
    #[arg(long, value_parser = extra_name_with_clap_error)]
    pub extra: Vec<ExtraName>,

    /// The Python interpreter to evaluate environment markers against.
    ///
    /// Defaults to the first `python3` or `python` on the `PATH`.
    #[arg(long, env = EnvVars::MINVERSIONS_PYTHON, conflicts_with = "markers")]
    pub python: Option<PathBuf>,

    /// A JSON file of marker values to evaluate environment markers against, in place of
    /// querying an interpreter.
    #[arg(long)]
    pub markers: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// The environments to prepare.
    ///
    /// Defaults to every configured environment.
    #[arg(short = 'e', long = "env", value_name = "ENV")]
    pub envs: Vec<String>,

    /// Install the minimum permitted version of each dependency, in every environment.
    #[arg(
        long,
        env = EnvVars::MINVERSIONS,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub minversions: bool,

    /// Recreate the environments, even if they already exist.
    #[arg(short, long)]
    pub recreate: bool,

    /// The source distribution under test.
    ///
    /// Overridden by `TOX_PACKAGE`, in an environment's `setenv` or the process environment.
    #[arg(long)]
    pub package: Option<PathBuf>,
}
