//! The drawing surface as seen by the org chart engine.
//!
//! A [`Scene`] is a flat list of [`Element`]s plus a side table that maps an
//! element id to the org chart identity stored for it. Elements never carry
//! org chart fields themselves.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{OrgChartError, Result};
use crate::geometry::{ArrowEnd, BindingGeometry, Bounds, Point};
use crate::ir::Attribute;
use crate::theme::{FillStyle, StrokeStyle, StyleContext};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Rectangle,
    Diamond,
    Ellipse,
    Image,
    Frame,
    Text,
    Arrow,
    Line,
    Freedraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Text,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BoundKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: String,
    pub fixed_point: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Arrow,
    Triangle,
    Bar,
    Dot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_deleted: bool,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub roughness: f64,
    pub opacity: f64,
    pub rounded: bool,
    pub bound_elements: Vec<BoundElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Label before wrapping; `text` holds the wrapped lines.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub original_text: String,
    pub font_size: f64,
    pub font_family: String,
    pub line_height: f64,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<Binding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<Binding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_arrowhead: Option<Arrowhead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_arrowhead: Option<Arrowhead>,
}

impl Default for Element {
    fn default() -> Self {
        Self::new("", ElementKind::Rectangle)
    }
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        let style = StyleContext::default();
        Self {
            id: id.into(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            is_deleted: false,
            stroke_color: style.stroke_color,
            background_color: style.background_color,
            fill_style: style.fill_style,
            stroke_width: style.stroke_width,
            stroke_style: style.stroke_style,
            roughness: style.roughness,
            opacity: style.opacity,
            rounded: style.rounded,
            bound_elements: Vec::new(),
            container_id: None,
            text: String::new(),
            original_text: String::new(),
            font_size: style.font_size,
            font_family: style.font_family,
            line_height: 1.25,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            points: Vec::new(),
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: None,
        }
    }

    /// A new shape styled from the current drawing defaults.
    pub fn styled(id: impl Into<String>, kind: ElementKind, style: &StyleContext) -> Self {
        let mut element = Self::new(id, kind);
        element.apply_style(style);
        element
    }

    pub fn apply_style(&mut self, style: &StyleContext) {
        self.stroke_color = style.stroke_color.clone();
        self.background_color = style.background_color.clone();
        self.fill_style = style.fill_style;
        self.stroke_width = style.stroke_width;
        self.stroke_style = style.stroke_style;
        self.roughness = style.roughness;
        self.opacity = style.opacity;
        self.rounded = style.rounded;
        self.font_family = style.font_family.clone();
        self.font_size = style.font_size;
    }

    /// Copies stroke, fill and opacity from another element.
    pub fn inherit_style(&mut self, from: &Element) {
        self.stroke_color = from.stroke_color.clone();
        self.background_color = from.background_color.clone();
        self.fill_style = from.fill_style;
        self.stroke_width = from.stroke_width;
        self.stroke_style = from.stroke_style;
        self.roughness = from.roughness;
        self.opacity = from.opacity;
        self.rounded = from.rounded;
    }

    pub fn is_arrow(&self) -> bool {
        self.kind == ElementKind::Arrow
    }

    /// Shapes connectors may attach to. Text only qualifies when it is not
    /// itself the label of a container.
    pub fn is_bindable(&self) -> bool {
        match self.kind {
            ElementKind::Rectangle
            | ElementKind::Diamond
            | ElementKind::Ellipse
            | ElementKind::Image
            | ElementKind::Frame => true,
            ElementKind::Text => self.container_id.is_none(),
            ElementKind::Arrow | ElementKind::Line | ElementKind::Freedraw => false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        if self.points.is_empty() {
            return Bounds::from_rect(self.x, self.y, self.width, self.height);
        }
        let local = Bounds::common(
            self.points
                .iter()
                .map(|p| Bounds::from_rect(p.x, p.y, 0.0, 0.0)),
        )
        .unwrap_or_else(|| Bounds::from_rect(0.0, 0.0, 0.0, 0.0));
        Bounds {
            min_x: self.x + local.min_x,
            min_y: self.y + local.min_y,
            max_x: self.x + local.max_x,
            max_y: self.y + local.max_y,
        }
    }

    /// Registers a bound element once.
    pub fn add_bound(&mut self, id: &str, kind: BoundKind) {
        if self.bound_elements.iter().any(|bound| bound.id == id) {
            return;
        }
        self.bound_elements.push(BoundElement {
            id: id.to_string(),
            kind,
        });
    }

    /// Re-derives `width`/`height` of a connector from its points.
    pub fn fit_points(&mut self) {
        let bounds = self.bounds();
        self.width = bounds.width();
        self.height = bounds.height();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipMetadata {
    pub rel_id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Org chart identity stored alongside an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementMetadata {
    Node(NodeMetadata),
    Relationship(RelationshipMetadata),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub org_chart: BTreeMap<String, ElementMetadata>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| OrgChartError::Scene(err.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn non_deleted(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|element| !element.is_deleted)
    }

    /// Non-deleted elements keyed by id.
    pub fn element_map(&self) -> HashMap<&str, &Element> {
        self.non_deleted()
            .map(|element| (element.id.as_str(), element))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.non_deleted().find(|element| element.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|element| !element.is_deleted && element.id == id)
    }

    /// Every id present, deleted elements included.
    pub fn element_ids(&self) -> HashSet<String> {
        self.elements
            .iter()
            .map(|element| element.id.clone())
            .collect()
    }

    pub fn metadata(&self, id: &str) -> Option<&ElementMetadata> {
        self.org_chart.get(id)
    }

    pub fn node_metadata(&self, id: &str) -> Option<&NodeMetadata> {
        match self.org_chart.get(id) {
            Some(ElementMetadata::Node(node)) => Some(node),
            _ => None,
        }
    }

    pub fn relationship_metadata(&self, id: &str) -> Option<&RelationshipMetadata> {
        match self.org_chart.get(id) {
            Some(ElementMetadata::Relationship(rel)) => Some(rel),
            _ => None,
        }
    }

    pub fn set_metadata(&mut self, id: impl Into<String>, metadata: ElementMetadata) {
        self.org_chart.insert(id.into(), metadata);
    }

    /// The text element bound inside `container`, if any.
    pub fn bound_text(&self, container: &Element) -> Option<&Element> {
        container
            .bound_elements
            .iter()
            .filter(|bound| bound.kind == BoundKind::Text)
            .find_map(|bound| self.get(&bound.id))
            .filter(|text| text.kind == ElementKind::Text)
    }

    /// Bound label text of `container` as written, before any wrapping.
    pub fn label_text(&self, container: &Element) -> Option<&str> {
        self.bound_text(container)
            .map(|text| {
                if text.original_text.is_empty() {
                    text.text.as_str()
                } else {
                    text.original_text.as_str()
                }
            })
            .filter(|text| !text.is_empty())
    }

    pub fn common_bounds<'a, I>(&self, ids: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Bounds::common(
            ids.into_iter()
                .filter_map(|id| self.get(id))
                .map(Element::bounds),
        )
    }

    /// Bounds of every non-deleted element.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::common(self.non_deleted().map(Element::bounds))
    }

    /// Appends a synthesized fragment. Fails without touching `self` if any
    /// fragment id already exists here or repeats within the fragment.
    pub fn merge(&mut self, fragment: Scene) -> Result<Vec<String>> {
        let mut seen = self.element_ids();
        for element in &fragment.elements {
            if !seen.insert(element.id.clone()) {
                return Err(OrgChartError::DuplicateElement(element.id.clone()));
            }
        }
        let ids = fragment
            .elements
            .iter()
            .map(|element| element.id.clone())
            .collect();
        self.elements.extend(fragment.elements);
        self.org_chart.extend(fragment.org_chart);
        Ok(ids)
    }

    /// Recomputes the rendered endpoints of `arrow_id` from its bindings.
    /// Endpoints whose binding cannot be resolved keep their position.
    pub fn rebind_arrow(&mut self, arrow_id: &str, geometry: &dyn BindingGeometry) {
        let Some(arrow) = self.get(arrow_id).filter(|a| a.is_arrow()) else {
            return;
        };
        let resolve = |end: ArrowEnd, binding: Option<&Binding>| {
            let binding = binding?;
            let target = self.get(&binding.element_id)?;
            geometry.bound_point(arrow, end, binding, target)
        };
        let start = resolve(ArrowEnd::Start, arrow.start_binding.as_ref());
        let end = resolve(ArrowEnd::End, arrow.end_binding.as_ref());
        if start.is_none() && end.is_none() {
            return;
        }
        let Some(arrow) = self.get_mut(arrow_id) else {
            return;
        };
        if arrow.points.len() < 2 {
            arrow.points = vec![Point::ORIGIN, Point::ORIGIN];
        }
        let last = arrow.points.len() - 1;
        if let Some(start) = start {
            arrow.points[0] = start;
        }
        if let Some(end) = end {
            arrow.points[last] = end;
        }
        normalize_points(arrow);
    }
}

/// Shifts an arrow so its first point sits at the local origin.
pub(crate) fn normalize_points(arrow: &mut Element) {
    let Some(first) = arrow.points.first().copied() else {
        return;
    };
    if first != Point::ORIGIN {
        arrow.x += first.x;
        arrow.y += first.y;
        for point in &mut arrow.points {
            point.x -= first.x;
            point.y -= first.y;
        }
    }
    arrow.fit_points();
}
