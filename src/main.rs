use anyhow::{Context, Result};
use cli::{Cli, Commands, HookArgs};
use config::Configuration;
use context::{BuildContext, BuildTarget};
use cover::Pdftoppm;
use exclude::ExcludePatterns;
use overrides::{load_overrides, BuildOverrides};
use project::ProjectSettings;
use redirects::RedirectTable;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod config;
mod context;
mod cover;
mod error;
mod exclude;
mod hook;
mod logger;
mod manifest;
mod overrides;
mod paths;
mod project;
mod redirects;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match &cli.command {
        Commands::Init => init(&cli.config),
        Commands::Settings => {
            let config = Configuration::load(&cli.config)
                .with_context(|| "Failed to load project configuration")?;
            let context = cli
                .environment
                .context()
                .build()
                .with_context(|| "Failed to assemble build context")?;
            let overrides = load_build_overrides(&context)?;
            let today = chrono::Local::now().date_naive();
            let settings = ProjectSettings::resolve(&config.project, &overrides, today)
                .with_context(|| "Failed to resolve project settings")?;
            print_json(&settings)
        }
        Commands::Excludes { paths } => {
            let context = cli
                .environment
                .context()
                .build()
                .with_context(|| "Failed to assemble build context")?;
            let excludes = ExcludePatterns::build(&context)
                .with_context(|| "Failed to build exclude patterns")?;

            if paths.is_empty() {
                for pattern in excludes.patterns() {
                    println!("{pattern}");
                }
                log::debug!("todo_include_todos = {}", excludes.include_todos());
            } else {
                for path in paths {
                    let verdict = if excludes.is_excluded(path) {
                        "excluded"
                    } else {
                        "included"
                    };
                    println!("{verdict}\t{}", path.display());
                }
            }
            Ok(())
        }
        Commands::Hook(args) => run_hook(&cli, args),
    }
}

fn run_hook(cli: &Cli, args: &HookArgs) -> Result<()> {
    let config = Configuration::load(&cli.config)
        .with_context(|| "Failed to load project configuration")?;
    let context = cli
        .environment
        .context()
        .outdir(args.outdir.clone())
        .manifest_dir(args.manifest_dir.clone())
        .build()
        .with_context(|| "Failed to assemble build context")?;
    let overrides = load_build_overrides(&context)?;

    let target = args
        .target
        .unwrap_or_else(|| BuildTarget::from_outdir(&context.outdir));

    let rasterizer = Pdftoppm::with_program(args.pdftoppm.clone());
    let outcome = hook::on_build_start(target, &overrides, &context, &config, &rasterizer)
        .with_context(|| format!("Build hook failed for target {target}"))?;

    if args.write_redirects && !outcome.redirects.is_empty() {
        let mut table = RedirectTable::new();
        table.extend_from(&config.redirects);
        let written = table
            .write_stubs(&context.outdir)
            .with_context(|| "Failed to write redirect pages")?;
        log::info!("Wrote {} redirect page(s)", written.len());
    }

    print_json(&outcome)
}

fn init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    let config = toml::to_string_pretty(&Configuration::default())
        .with_context(|| "Failed to convert configuration to TOML")?;
    std::fs::write(path, config).with_context(|| "Failed to write configuration file")?;
    println!("{} written!", path.display());
    Ok(())
}

fn load_build_overrides(context: &BuildContext) -> Result<BuildOverrides> {
    let overrides = load_overrides(context.overrides_file.as_deref())
        .with_context(|| "Failed to load build overrides")?;
    if overrides.is_empty() {
        log::debug!("No build overrides, using defaults");
    }
    Ok(overrides)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).with_context(|| "Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
