//! Export and import pipelines between a scene and interchange text.

use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::csv::{parse_csv, serialize_csv};
use crate::error::{OrgChartError, Result};
use crate::extract::extract;
use crate::geometry::BindingGeometry;
use crate::ids::IdGenerator;
use crate::ir::OrgChartData;
use crate::json::{parse_json, serialize_json};
use crate::scene::Scene;
use crate::synthesize::synthesize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Result of an I/O step the user may abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoOutcome<T> {
    Done(T),
    Cancelled,
}

/// Extracts the org chart behind `selection` (or the whole scene) and
/// serializes it.
pub fn export<S: AsRef<str>>(scene: &Scene, selection: &[S], format: ExportFormat) -> Result<String> {
    let data = extract(scene, selection);
    match format {
        ExportFormat::Json => serialize_json(&data),
        ExportFormat::Csv => Ok(serialize_csv(&data)),
    }
}

/// Parses `text` as a JSON document, falling back to CSV. Fails with
/// [`OrgChartError::InvalidData`] carrying both reasons when neither fits.
pub fn parse_any(text: &str, ids: &mut dyn IdGenerator) -> Result<OrgChartData> {
    let json_err = match parse_json(text) {
        Ok(data) => {
            debug!(format = "json"; "recognised org chart input");
            return Ok(data);
        }
        Err(err) => err,
    };
    match parse_csv(text, ids) {
        Ok(data) => {
            debug!(format = "csv", json_error = json_err.to_string(); "recognised org chart input");
            Ok(data)
        }
        Err(csv_err) => Err(OrgChartError::InvalidData {
            json: json_err.to_string(),
            csv: csv_err.to_string(),
        }),
    }
}

/// Parses `text`, synthesizes it against the ids already in `scene` and
/// merges the result. Nothing is added when any step fails. Returns the
/// ids of the new elements.
pub fn import_into(
    scene: &mut Scene,
    text: &str,
    config: &Config,
    ids: &mut dyn IdGenerator,
    geometry: &dyn BindingGeometry,
) -> Result<Vec<String>> {
    let data = parse_any(text, ids)?;
    let fragment = synthesize(&data, config, &scene.element_ids(), ids, geometry);
    let added = scene.merge(fragment)?;
    info!(
        nodes = data.nodes.len(),
        relationships = data.relationships.len(),
        elements = added.len();
        "imported org chart"
    );
    Ok(added)
}

/// Reads a file, or stdin for `None` and `-`. An interrupted read counts
/// as a cancellation rather than an error.
pub fn read_source(path: Option<&Path>) -> Result<IoOutcome<String>> {
    let result = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    cancellable(result)
}

/// Writes to a file, or stdout for `None`.
pub fn write_target(path: Option<&Path>, contents: &str) -> Result<IoOutcome<()>> {
    let result = match path {
        Some(path) => std::fs::write(path, contents),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
        }
    };
    cancellable(result)
}

fn cancellable<T>(result: io::Result<T>) -> Result<IoOutcome<T>> {
    match result {
        Ok(value) => Ok(IoOutcome::Done(value)),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => {
            info!("I/O cancelled");
            Ok(IoOutcome::Cancelled)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxBinding;
    use crate::ids::SequentialIds;
    use crate::scene::{Element, ElementKind};

    const CSV: &str = "id,name,parent\nceo,Dana,\ncto,Lee,ceo";

    #[test]
    fn json_is_tried_first() {
        let text = r#"{"version": 1, "nodes": [{"id": "a", "name": "A"}], "relationships": []}"#;
        let data = parse_any(text, &mut SequentialIds::default()).unwrap();
        assert_eq!(data.nodes[0].id, "a");
    }

    #[test]
    fn csv_is_the_fallback() {
        let data = parse_any(CSV, &mut SequentialIds::default()).unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.relationships[0].id, "ceo->cto");
    }

    #[test]
    fn neither_format_reports_both_reasons() {
        let err = parse_any(r#"{"version": 7, "nodes": [], "relationships": []}"#, &mut SequentialIds::default())
            .unwrap_err();
        match err {
            OrgChartError::InvalidData { json, csv } => {
                assert!(json.contains("version"), "{json}");
                assert!(csv.contains("missing required columns"), "{csv}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn import_merges_without_collisions() {
        let mut scene = Scene::new();
        scene.elements.push(Element::new("ceo", ElementKind::Rectangle));
        let mut ids = SequentialIds::new("imp-");
        let added = import_into(&mut scene, CSV, &Config::default(), &mut ids, &BoxBinding).unwrap();
        assert_eq!(added.len(), 5);
        assert!(!added.contains(&"ceo".to_string()));
        assert_eq!(scene.elements.len(), 6);
        let unique: std::collections::HashSet<&str> =
            scene.elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(unique.len(), scene.elements.len());
    }

    #[test]
    fn failed_import_leaves_scene_untouched() {
        let mut scene = Scene::new();
        scene.elements.push(Element::new("keep", ElementKind::Rectangle));
        let before = scene.clone();
        let result = import_into(
            &mut scene,
            "no,columns,here",
            &Config::default(),
            &mut SequentialIds::default(),
            &BoxBinding,
        );
        assert!(result.is_err());
        assert_eq!(scene, before);
    }

    #[test]
    fn export_then_import_round_trips_structure() {
        let mut source = Scene::new();
        import_into(&mut source, CSV, &Config::default(), &mut SequentialIds::default(), &BoxBinding)
            .unwrap();
        let csv = export::<&str>(&source, &[], ExportFormat::Csv).unwrap();
        assert_eq!(csv, "id,name,parent\nceo,Dana,\ncto,Lee,ceo");
        let json = export::<&str>(&source, &[], ExportFormat::Json).unwrap();
        let data = parse_json(&json).unwrap();
        assert!(!data.needs_layout());
        assert_eq!(data.relationships.len(), 1);
    }

    #[test]
    fn interrupted_io_is_a_cancellation() {
        let interrupted: io::Result<String> = Err(io::Error::from(io::ErrorKind::Interrupted));
        assert_eq!(cancellable(interrupted).unwrap(), IoOutcome::Cancelled);
        let denied: io::Result<String> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(cancellable(denied), Err(OrgChartError::Io(_))));
    }

    #[test]
    fn reads_files_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let outcome = read_source(Some(file.path())).unwrap();
        assert_eq!(outcome, IoOutcome::Done(CSV.to_string()));
    }
}
