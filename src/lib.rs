pub mod attribute;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod csv;
pub mod edit;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod ids;
pub mod import;
pub mod ir;
pub mod json;
pub mod label;
pub mod layout;
pub mod scene;
pub mod synthesize;
pub mod text;
pub mod theme;

pub use config::{Config, LayoutConfig, load_config};
pub use error::{OrgChartError, Result};
pub use extract::extract;
pub use import::{ExportFormat, IoOutcome, export, import_into, parse_any};
pub use ir::{Attribute, AttributeDisplay, Node, ORG_CHART_VERSION, OrgChartData, Relationship};
pub use layout::layout;
pub use scene::{Element, ElementKind, Scene};
pub use synthesize::synthesize;
