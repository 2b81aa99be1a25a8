//! buildrecipe CLI
//!
//! Entry point for the `buildrecipe` command-line tool.

use buildrecipe::config::{CliOverrides, LoadedRecipe, DEFAULT_RECIPE_FILE};
use buildrecipe::pipeline::{self, PipelineConfig, PipelineError, DEFAULT_OUT_DIR};
use buildrecipe::{Requirement, Scope};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "buildrecipe")]
#[command(about = "Generate build-system settings from a declarative recipe", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RecipeArgs {
    /// Path to the recipe file (default: recipe.toml)
    #[arg(long, short = 'r')]
    recipe: Option<PathBuf>,

    /// Path to host defaults (default: ~/.config/buildrecipe/defaults.toml)
    #[arg(long)]
    host_defaults: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the recipe and write generated settings
    Generate {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Output directory
        #[arg(long, short = 'o', default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,

        /// Override the minimum language standard
        #[arg(long)]
        standard: Option<u32>,

        /// Extra requirement as name/version (repeatable, wins over the recipe,
        /// keeps the scope the recipe declares for that name)
        #[arg(long = "require")]
        requires: Vec<Requirement>,

        /// Do not export a compile-commands database
        #[arg(long)]
        no_compile_commands: bool,

        /// Presets file path handed to the build tool
        #[arg(long)]
        presets: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate the recipe without generating
    Verify {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Standard the compiler is configured for
        #[arg(long)]
        compiler_standard: Option<u32>,
    },

    /// Print the resolved requirement list
    Resolve {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Only requirements with this scope (build, test)
        #[arg(long)]
        scope: Option<Scope>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            recipe,
            out,
            standard,
            requires,
            no_compile_commands,
            presets,
            json,
        } => {
            let overrides = CliOverrides {
                minimum_standard: standard,
                export_compile_commands: no_compile_commands.then_some(false),
                presets_path: presets,
                requires,
            };
            run_generate(pipeline_config(recipe, overrides, None), out, json);
        }
        Commands::Verify {
            recipe,
            compiler_standard,
        } => {
            run_verify(pipeline_config(recipe, CliOverrides::default(), compiler_standard));
        }
        Commands::Resolve { recipe, scope, json } => {
            run_resolve(pipeline_config(recipe, CliOverrides::default(), None), scope, json);
        }
    }
}

fn pipeline_config(
    args: RecipeArgs,
    overrides: CliOverrides,
    compiler_standard: Option<u32>,
) -> PipelineConfig {
    let recipe_path = match args.recipe {
        Some(path) => {
            if !path.exists() {
                eprintln!("Recipe not found: {}", path.display());
                process::exit(1);
            }
            path
        }
        None => PathBuf::from(DEFAULT_RECIPE_FILE),
    };

    PipelineConfig {
        recipe_path: Some(recipe_path),
        host_defaults_path: args.host_defaults.or_else(LoadedRecipe::default_host_path),
        overrides,
        compiler_standard,
    }
}

fn fail(error: PipelineError) -> ! {
    match error.code() {
        Some(code) => eprintln!("Error [{}]: {}", code, error),
        None => eprintln!("Error: {}", error),
    }
    process::exit(1);
}

fn run_generate(config: PipelineConfig, out: PathBuf, json_output: bool) {
    let outcome = match pipeline::run_generate(&config, out) {
        Ok(outcome) => outcome,
        Err(e) => fail(e),
    };

    if json_output {
        match serde_json::to_string_pretty(&outcome.report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!(
        "Generated {} requirement(s) into {}",
        outcome.config.requirements.len(),
        outcome.report.out_dir.display()
    );
    for path in &outcome.report.written {
        println!("  {}", path.display());
    }
    println!("  digest: {}", outcome.report.digest);
}

fn run_verify(config: PipelineConfig) {
    let (recipe, validated) = match pipeline::run_verify(&config) {
        Ok(result) => result,
        Err(e) => fail(e),
    };

    let manifest = validated.manifest();
    println!("Recipe valid");
    println!();
    for source in &recipe.sources {
        match source.path {
            Some(ref path) => println!("  Layer: {:?} ({})", source.origin, path),
            None => println!("  Layer: {:?}", source.origin),
        }
    }
    println!("  Minimum standard: {}", manifest.minimum_standard);
    println!("  Export compile commands: {}", manifest.export_compile_commands);
    if let Some(ref presets) = manifest.presets_path {
        println!("  Presets: {}", presets);
    }
    println!("  Layout: {}", manifest.layout_mode.as_str());
    println!("  Settings: {}", manifest.settings.join(", "));
    println!("  Requirements: {}", validated.resolved_requirements().len());
    if let Some(standard) = config.compiler_standard {
        println!("  Compiler standard {} satisfies minimum", standard);
    }
}

fn run_resolve(config: PipelineConfig, scope: Option<Scope>, json_output: bool) {
    let (_, validated) = match pipeline::run_verify(&config) {
        Ok(result) => result,
        Err(e) => fail(e),
    };

    let requirements: Vec<&Requirement> = validated
        .resolved_requirements()
        .iter()
        .filter(|r| scope.map_or(true, |s| r.scope == s))
        .collect();

    if json_output {
        match serde_json::to_string_pretty(&requirements) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for requirement in requirements {
        println!("{} ({})", requirement, requirement.scope);
    }
}
