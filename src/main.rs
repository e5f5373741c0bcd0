//! classopts CLI
//!
//! Entry point for the `classopts` command-line tool.

use clap::{Parser, Subcommand};
use classopts::logging::init_tracing;
use classopts::{HierarchyFile, Layer, ResolvedReport, ResolvedView, TypeRegistry};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "classopts")]
#[command(about = "Resolve inheritable per-type options", version)]
struct Cli {
    /// Path to hierarchy file
    #[arg(long, short = 'f', global = true, default_value = "classopts.toml")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved options of a type
    Show {
        /// Type name
        type_name: String,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Also write the JSON report to this path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print one resolved field as JSON (exit 1 when undefined)
    Get {
        type_name: String,
        field: String,
    },

    /// Show which layer and type supply a field
    Explain {
        type_name: String,
        field: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the linearized default chain of a type
    Mro {
        type_name: String,
    },

    /// Check that every type in the hierarchy resolves
    Verify,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            type_name,
            human,
            output,
        } => run_show(&cli.file, &type_name, human, output),
        Commands::Get { type_name, field } => run_get(&cli.file, &type_name, &field),
        Commands::Explain {
            type_name,
            field,
            json,
        } => run_explain(&cli.file, &type_name, &field, json),
        Commands::Mro { type_name } => run_mro(&cli.file, &type_name),
        Commands::Verify => run_verify(&cli.file),
    }
}

fn load(path: &Path) -> (HierarchyFile, TypeRegistry) {
    let file = match HierarchyFile::load(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    match file.build() {
        Ok(registry) => (file, registry),
        Err(e) => {
            eprintln!("Hierarchy error: {}", e);
            process::exit(1);
        }
    }
}

fn view_or_exit(registry: &TypeRegistry, type_name: &str) -> Arc<ResolvedView> {
    match registry.get(type_name) {
        Some(view) => Arc::clone(view),
        None => {
            eprintln!("Unknown type: {}", type_name);
            process::exit(1);
        }
    }
}

fn run_show(path: &Path, type_name: &str, human: bool, output: Option<PathBuf>) {
    let (file, registry) = load(path);
    let view = view_or_exit(&registry, type_name);
    let report = ResolvedReport::build(&view, file.source.as_ref());

    if let Some(out) = output {
        if let Err(e) = report.write_to_file(&out) {
            eprintln!("Error writing {}: {}", out.display(), e);
            process::exit(1);
        }
        eprintln!("Wrote: {}", out.display());
    }

    if human {
        print!("{}", report.to_human());
    } else {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_get(path: &Path, type_name: &str, field: &str) {
    let (_, registry) = load(path);
    let view = view_or_exit(&registry, type_name);

    match view.get(field) {
        Some(value) => println!("{}", value),
        None => {
            eprintln!("{}.{} is not defined", type_name, field);
            process::exit(1);
        }
    }
}

fn run_explain(path: &Path, type_name: &str, field: &str, json_output: bool) {
    let (_, registry) = load(path);
    let view = view_or_exit(&registry, type_name);

    let Some(entry) = view.entry(field) else {
        if json_output {
            println!("{}", serde_json::json!({ "field": field, "defined": false }));
        } else {
            println!("{}.{} is not defined by any layer", type_name, field);
            println!("  Searched: {}", view.mro().join(" -> "));
        }
        process::exit(1);
    };

    if json_output {
        let output = serde_json::json!({
            "field": field,
            "defined": true,
            "value": entry.value,
            "layer": entry.layer,
            "owner": entry.owner,
        });
        println!("{}", output);
    } else {
        let layer = match entry.layer {
            Layer::Override => "override",
            Layer::Default => "default",
        };
        println!("{}.{} = {}", type_name, field, entry.value);
        println!("  From: {} of {}", layer, entry.owner);
        println!("  MRO: {}", view.mro().join(" -> "));
    }
}

fn run_mro(path: &Path, type_name: &str) {
    let (_, registry) = load(path);
    let view = view_or_exit(&registry, type_name);

    for owner in view.mro() {
        println!("{}", owner);
    }
}

fn run_verify(path: &Path) {
    let (file, registry) = load(path);

    println!("Hierarchy valid: {}", path.display());
    println!();
    println!("  Types: {}", registry.len());
    println!("  Keys: {} / {}", file.keys.overrides, file.keys.defaults);
    if let Some(ref source) = file.source {
        println!("  Digest: {}", source.digest);
    }
}
