//! Layout export as JSON.

use serde::Serialize;
use trellis_core::{ExportError, Node};

/// Computed geometry of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutReport>,
}

impl LayoutReport {
    /// Snapshot a laid-out tree. Nodes without a layout report zeros.
    pub fn from_node(node: &Node) -> Self {
        let layout = node.layout_or_default();
        Self {
            left: layout.left,
            top: layout.top,
            width: layout.width,
            height: layout.height,
            text_content: node.text_content().map(str::to_string),
            children: node.children.iter().map(LayoutReport::from_node).collect(),
        }
    }
}

/// Pretty-printed JSON of a laid-out tree.
pub fn layout_to_json(node: &Node) -> Result<String, ExportError> {
    serde_json::to_string_pretty(&LayoutReport::from_node(node)).map_err(|e| {
        ExportError::EncodeFailed {
            reason: e.to_string(),
        }
    })
}
