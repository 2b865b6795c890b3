use crate::config::{Config, load_config};
use crate::edit::{add_child, arrange_selection, selected_node, set_node_attributes, set_node_label};
use crate::geometry::BoxBinding;
use crate::ids::RandomIds;
use crate::import::{ExportFormat, IoOutcome, export, import_into, parse_any, read_source, write_target};
use crate::json::serialize_json;
use crate::csv::serialize_csv;
use crate::layout::layout;
use crate::scene::Scene;
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "orgc", version, about = "Org chart export, import and layout for whiteboard scenes")]
pub struct Args {
    /// Config file (JSON5) with style and layout overrides
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the org chart behind a selection (or the whole scene)
    Export {
        /// Scene file
        #[arg(short = 's', long = "scene")]
        scene: PathBuf,
        /// Comma-separated element ids; empty means the whole scene
        #[arg(long = "select", value_delimiter = ',')]
        select: Vec<String>,
        #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Add an org chart document (JSON or CSV) to a scene
    Import {
        /// Scene to import into. Starts from an empty scene if omitted.
        #[arg(short = 's', long = "scene")]
        scene: Option<PathBuf>,
        /// Org chart file or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Lay out an org chart document without touching any scene
    Layout {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
        #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
        format: ExportFormat,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Re-level selected shapes into rows
    Arrange {
        #[arg(short = 's', long = "scene")]
        scene: PathBuf,
        #[arg(long = "select", value_delimiter = ',', required = true)]
        select: Vec<String>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Add a child shape below a parent
    AddChild {
        #[arg(short = 's', long = "scene")]
        scene: PathBuf,
        #[arg(short = 'p', long = "parent")]
        parent: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Rename the selected node
    Label {
        #[arg(short = 's', long = "scene")]
        scene: PathBuf,
        #[arg(long = "select", value_delimiter = ',', required = true)]
        select: Vec<String>,
        #[arg(short = 'n', long = "name")]
        name: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Replace the attributes of the selected node (`name=value#color; ...`)
    Attributes {
        #[arg(short = 's', long = "scene")]
        scene: PathBuf,
        #[arg(long = "select", value_delimiter = ',', required = true)]
        select: Vec<String>,
        #[arg(short = 'a', long = "attributes")]
        attributes: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut ids = RandomIds;

    match &args.command {
        Command::Export {
            scene,
            select,
            format,
            output,
        } => {
            let Some(scene) = read_scene(Some(scene.as_path()))? else {
                return Ok(());
            };
            let text = export(&scene, select.as_slice(), *format)?;
            emit(output.as_deref(), &text)
        }
        Command::Import {
            scene,
            input,
            output,
        } => {
            let Some(mut target) = read_scene(scene.as_deref())? else {
                return Ok(());
            };
            let Some(text) = read_text(input.as_deref())? else {
                return Ok(());
            };
            let added = import_into(&mut target, &text, &config, &mut ids, &BoxBinding)?;
            info!(elements = added.len(); "Import finished");
            emit(output.as_deref(), &target.to_json_pretty()?)
        }
        Command::Layout {
            input,
            format,
            output,
        } => {
            let Some(text) = read_text(input.as_deref())? else {
                return Ok(());
            };
            let data = layout(&parse_any(&text, &mut ids)?, &config.layout);
            let rendered = match format {
                ExportFormat::Json => serialize_json(&data)?,
                ExportFormat::Csv => serialize_csv(&data),
            };
            emit(output.as_deref(), &rendered)
        }
        Command::Arrange {
            scene,
            select,
            output,
        } => {
            let Some(mut target) = read_scene(Some(scene.as_path()))? else {
                return Ok(());
            };
            if arrange_selection(&mut target, select.as_slice(), &config.layout, &BoxBinding).is_none() {
                return Err(anyhow::anyhow!(
                    "Arranging needs at least two connectable shapes in the selection"
                ));
            }
            emit(output.as_deref(), &target.to_json_pretty()?)
        }
        Command::AddChild {
            scene,
            parent,
            output,
        } => {
            let Some(mut target) = read_scene(Some(scene.as_path()))? else {
                return Ok(());
            };
            let (child, arrow) = add_child(&mut target, parent, &config, &mut ids, &BoxBinding)
                .ok_or_else(|| anyhow::anyhow!("No connectable shape with id {}", parent))?;
            info!(child = child.as_str(), arrow = arrow.as_str(); "Added child");
            emit(output.as_deref(), &target.to_json_pretty()?)
        }
        Command::Label {
            scene,
            select,
            name,
            output,
        } => edit_node(scene, select, output.as_deref(), &config, |target, node, config| {
            set_node_label(target, node, name, config, &mut ids)
        }),
        Command::Attributes {
            scene,
            select,
            attributes,
            output,
        } => edit_node(scene, select, output.as_deref(), &config, |target, node, config| {
            set_node_attributes(target, node, attributes, config, &mut ids)
        }),
    }
}

fn edit_node<F>(
    scene: &Path,
    select: &[String],
    output: Option<&Path>,
    config: &Config,
    apply: F,
) -> Result<()>
where
    F: FnOnce(&mut Scene, &str, &Config) -> bool,
{
    let Some(mut target) = read_scene(Some(scene))? else {
        return Ok(());
    };
    let node = selected_node(&target, select)
        .ok_or_else(|| anyhow::anyhow!("Selection must be a single connectable shape"))?;
    if !apply(&mut target, &node, config) {
        warn!(node = node.as_str(); "Nothing changed");
    }
    emit(output, &target.to_json_pretty()?)
}

fn read_text(path: Option<&Path>) -> Result<Option<String>> {
    match read_source(path)? {
        IoOutcome::Done(text) => Ok(Some(text)),
        IoOutcome::Cancelled => {
            info!("Input cancelled, nothing written");
            Ok(None)
        }
    }
}

/// Loads a scene file; `None` yields an empty scene.
fn read_scene(path: Option<&Path>) -> Result<Option<Scene>> {
    let Some(path) = path else {
        return Ok(Some(Scene::new()));
    };
    match read_text(Some(path))? {
        Some(text) => Ok(Some(Scene::from_json(&text)?)),
        None => Ok(None),
    }
}

fn emit(output: Option<&Path>, contents: &str) -> Result<()> {
    if let IoOutcome::Cancelled = write_target(output, contents)? {
        info!("Output cancelled");
    }
    Ok(())
}
