//! Kiln CLI - Generate ray-marching shaders from demo scenes

mod scenes;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kiln_engine::{Engine, SourceBackend};
use scenes::Demo;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Compile SDF scene graphs into GLSL ray-marching shaders", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (defaults to {config_dir}/kiln/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated `map` body for a demo scene
    Fragment {
        /// Demo scene to generate
        #[arg(short, long, value_enum, default_value_t)]
        scene: Demo,
    },

    /// Assemble a complete shader for a demo scene
    Shader {
        /// Demo scene to generate
        #[arg(short, long, value_enum, default_value_t)]
        scene: Demo,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the vertex shader instead of the fragment shader
        #[arg(long)]
        vertex: bool,
    },

    /// Print the GLSL formula library
    Formulas {
        /// Print the Markdown reference instead of GLSL
        #[arg(long)]
        docs: bool,
    },

    /// Print the effective render settings as JSON
    Config {
        /// Write the effective settings to the default settings file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    // Log to stderr only - stdout carries shader text
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fragment { scene } => {
            let builder = scene.build()?;
            print!("{}", builder.generate_fragment());
        }
        Commands::Shader {
            scene,
            output,
            vertex,
        } => {
            run_shader(scene, output.as_deref(), vertex, cli.config.as_deref())?;
        }
        Commands::Formulas { docs } => {
            if docs {
                print!("{}", kiln_math::get_docs());
            } else {
                print!("{}", kiln_math::get_glsl_code());
            }
        }
        Commands::Config { save } => {
            let config = settings::load_settings(cli.config.as_deref())?;
            if save {
                let path = settings::save_settings(&config, None)?;
                info!(path = %path.display(), "Saved settings");
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run_shader(
    scene: Demo,
    output: Option<&Path>,
    vertex: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = settings::load_settings(config_path)?;
    let builder = scene.build()?;

    let mut engine = Engine::with_scene(builder, config, SourceBackend::new());
    engine.refresh()?;
    let program = engine
        .program()
        .context("Shader program was not built")?;

    let source = if vertex {
        &program.vertex
    } else {
        &program.fragment
    };

    match output {
        Some(path) => {
            fs::write(path, source)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                path = %path.display(),
                scene = ?scene,
                bytes = source.len(),
                "Wrote shader"
            );
        }
        None => print!("{source}"),
    }

    Ok(())
}
