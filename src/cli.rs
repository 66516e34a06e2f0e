use crate::config::CONFIG_FILE_NAME;
use crate::context::{BuildContextBuilder, BuildTarget};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default docs-setup.toml
    Init,
    /// Prints the resolved project settings as JSON
    Settings,
    /// Prints the exclude patterns, or whether each given source path is excluded
    Excludes {
        /// Source paths relative to the documentation root
        paths: Vec<PathBuf>,
    },
    /// Runs the build-start hook and prints its outcome as JSON
    Hook(HookArgs),
}

#[derive(Args, Debug)]
pub struct HookArgs {
    /// Build output directory
    #[clap(long)]
    pub outdir: PathBuf,
    /// Target being built; inferred from the output directory name if omitted
    #[clap(long, value_enum)]
    pub target: Option<BuildTarget>,
    /// Directory containing build-manifest.json
    #[clap(long, default_value = ".")]
    pub manifest_dir: PathBuf,
    /// Also write redirect stub pages into the output directory
    #[clap(long)]
    pub write_redirects: bool,
    /// pdftoppm executable used to render the e-book cover
    #[clap(long, env = "PDFTOPPM", default_value = "pdftoppm")]
    pub pdftoppm: PathBuf,
}

/// Build environment, each option also read from its environment variable.
///
/// The switches keep their environment semantics: `FRONTEND_TESTING` and
/// `SPHINX_LOCAL_BUILD` are on when set to anything non-empty,
/// `GEN_LEARN_SITE` only when it is exactly `yes`. On the command line the
/// bare switch turns them on.
#[derive(Args, Debug)]
pub struct EnvironmentArgs {
    /// INI file with per-build overrides
    #[clap(long, env = "SPHINX_CONF_INI", global = true)]
    pub overrides: Option<PathBuf>,
    /// Leave internal and unfinished material out of the build
    #[clap(
        long,
        env = "GEN_LEARN_SITE",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "yes"
    )]
    pub exclude_internal: Option<String>,
    /// File listing books to hide, one per line
    #[clap(long, env = "HIDDEN_BOOKS", global = true)]
    pub hidden_books: Option<PathBuf>,
    /// Skip asset injection for test builds
    #[clap(
        long,
        env = "FRONTEND_TESTING",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "1"
    )]
    pub testing: Option<String>,
    /// Tolerate a missing asset manifest
    #[clap(
        long,
        env = "SPHINX_LOCAL_BUILD",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "1"
    )]
    pub local_build: Option<String>,
}

/// Set to anything, including `0` or `false`, counts as on.
fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn is_yes(value: &Option<String>) -> bool {
    value.as_deref() == Some("yes")
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Project configuration file
    #[clap(long, default_value = CONFIG_FILE_NAME, global = true)]
    pub config: PathBuf,

    /// Print debug output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(flatten)]
    pub environment: EnvironmentArgs,
}

impl EnvironmentArgs {
    /// Start a build context from the environment; callers add the
    /// per-command pieces before building it.
    pub fn context(&self) -> BuildContextBuilder {
        let mut builder = BuildContextBuilder::default();
        builder
            .exclude_internal(is_yes(&self.exclude_internal))
            .testing(is_set(&self.testing))
            .local_build(is_set(&self.local_build));
        if let Some(overrides) = &self.overrides {
            builder.overrides_file(overrides.clone());
        }
        if let Some(hidden_books) = &self.hidden_books {
            builder.hidden_books(hidden_books.clone());
        }
        builder
    }
}
