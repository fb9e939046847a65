//! The styled node tree.
//!
//! Nodes own their children. The layout pass reads `style`, `text_content`
//! and `children` and writes `layout`; nothing else in the tree is touched.

use crate::style::Style;
use crate::types::Layout;

/// A styled node, optionally carrying text.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Node {
    /// Style of this node
    pub style: Style,
    /// Text content, if any
    pub text_content: Option<String>,
    /// Children in paint order
    pub children: Vec<Node>,
    /// Geometry from the last layout pass, relative to the parent
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    pub layout: Option<Layout>,
}

impl Node {
    /// Create an empty node with the given style.
    pub fn new(style: Style) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Create a text node.
    pub fn text(style: Style, text: impl Into<String>) -> Self {
        Self::new(style).with_text(text)
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Replace or clear the text content.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text_content = text;
    }

    /// Non-empty text content, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.text_content.as_deref().filter(|text| !text.is_empty())
    }

    /// True when this node needs text measurement.
    pub fn has_text(&self) -> bool {
        self.text_content().is_some()
    }

    /// Layout from the last pass, or a zero layout before the first one.
    pub fn layout_or_default(&self) -> Layout {
        self.layout.unwrap_or_default()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Visit every node in depth-first pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Child at a path of indices from this node.
    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &index| node.children.get(index))
    }

    /// Mutable child at a path of indices from this node.
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }
}

/// A canvas-sized root plus its tree, as loaded from a scene file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Root node; its size is forced to the canvas size
    pub root: Node,
}

impl Scene {
    pub fn new(width: u32, height: u32, root: Node) -> Self {
        Self { width, height, root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Node {
        Node::new(Style::new())
            .with_child(Node::text(Style::new(), "a"))
            .with_child(
                Node::new(Style::new())
                    .with_child(Node::text(Style::new(), "b"))
                    .with_child(Node::new(Style::new())),
            )
    }

    #[test]
    fn test_empty_text_is_not_text() {
        let node = Node::text(Style::new(), "");
        assert!(!node.has_text());
        assert!(Node::text(Style::new(), "x").has_text());
    }

    #[test]
    fn test_walk_is_pre_order() {
        let tree = sample_tree();
        let mut texts = Vec::new();
        tree.walk(&mut |node| texts.push(node.text_content().unwrap_or("-").to_string()));
        assert_eq!(texts, vec!["-", "a", "-", "b", "-"]);
        assert_eq!(tree.count(), 5);
    }

    #[test]
    fn test_descendant_paths() {
        let mut tree = sample_tree();
        assert_eq!(tree.descendant(&[1, 0]).and_then(Node::text_content), Some("b"));
        assert!(tree.descendant(&[3]).is_none());

        tree.descendant_mut(&[1, 0]).unwrap().set_text(None);
        assert!(!tree.descendant(&[1, 0]).unwrap().has_text());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_scene_from_json() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "width": 800,
                "height": 600,
                "root": {
                    "children": [
                        { "style": { "padding": 10 }, "textContent": "Hi" }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(scene.width, 800);
        assert_eq!(scene.root.children.len(), 1);
        assert_eq!(scene.root.children[0].text_content(), Some("Hi"));
        assert!(scene.root.children[0].layout.is_none());
    }
}
