use serde::{Deserialize, Serialize};

/// Version tag every interchange document must carry.
pub const ORG_CHART_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeDisplay {
    #[default]
    Label,
    Badge,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub display: AttributeDisplay,
}

impl Attribute {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: None,
            color: None,
            display: AttributeDisplay::Label,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Node {
    /// A node with no geometry yet; layout fills it in.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            attributes: Vec::new(),
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.x != 0.0 || self.y != 0.0 || self.width != 0.0 || self.height != 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Relationship {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: None,
            cardinality: None,
            attributes: Vec::new(),
        }
    }
}

/// The canonical document exchanged between codecs, layout and synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgChartData {
    pub version: u32,
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
}

impl OrgChartData {
    pub fn new(nodes: Vec<Node>, relationships: Vec<Relationship>) -> Self {
        Self {
            version: ORG_CHART_VERSION,
            nodes,
            relationships,
        }
    }

    /// True when no node carries any geometry, i.e. positions are unknown.
    pub fn needs_layout(&self) -> bool {
        self.nodes.iter().all(|node| !node.has_geometry())
    }
}

impl Default for OrgChartData {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_needs_layout() {
        assert!(OrgChartData::default().needs_layout());
    }

    #[test]
    fn any_geometry_disables_layout() {
        let mut positioned = Node::new("b", "B");
        positioned.width = 120.0;
        let data = OrgChartData::new(vec![Node::new("a", "A"), positioned], Vec::new());
        assert!(!data.needs_layout());
    }

    #[test]
    fn display_serializes_lowercase() {
        let attr = Attribute::new("1", "team").with_value("core");
        let json = serde_json::to_string(&attr).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","name":"team","value":"core","display":"label"}"#
        );
    }
}
