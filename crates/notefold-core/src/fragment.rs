use thiserror::Error;

/// Class carried by anchors that reference another note in the vault.
pub const INTERNAL_LINK_CLASS: &str = "internal-link";

/// Attribute on an internal link holding the raw target path reference.
pub const TARGET_ATTR: &str = "data-target";

/// Handle to a node inside a [`Fragment`]. Ids are arena indices and are
/// never reused within a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element tags the renderer emits. The reading view only ever produces this
/// closed set, so a full tag-name string is not carried around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Div,
    P,
    Span,
    A,
    Ul,
    Ol,
    Li,
    Heading(u8),
    Em,
    Strong,
    Code,
    Pre,
    Blockquote,
    Hr,
    Br,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error("node {0:?} has no parent; cannot insert relative to a detached node")]
    Detached(NodeId),
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: Tag,
        classes: Vec<String>,
        attrs: Vec<(String, String)>,
        hidden: bool,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An owned tree of rendered content nodes.
///
/// This is the "rendered fragment" the host render pipeline hands to
/// post-processors: a mutable arena tree whose only output channel is
/// in-place mutation. Detached subtrees stay allocated for the lifetime of
/// the fragment; the arena is discarded wholesale with the fragment.
#[derive(Debug)]
pub struct Fragment {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Fragment {
    /// Create a fragment with an empty `div` root container.
    pub fn new() -> Self {
        let root_node = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element {
                tag: Tag::Div,
                classes: Vec::new(),
                attrs: Vec::new(),
                hidden: false,
            },
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.push(NodeData::Element {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            hidden: false,
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `node` immediately before `reference` under the reference's
    /// parent. Fails if the reference is detached.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) -> Result<(), FragmentError> {
        let parent = self.parent(reference).ok_or(FragmentError::Detached(reference))?;
        self.detach(node);
        let idx = self.child_index(parent, reference);
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(idx, node);
        Ok(())
    }

    /// Insert `node` immediately after `reference` under the reference's
    /// parent. Fails if the reference is detached.
    pub fn insert_after(&mut self, node: NodeId, reference: NodeId) -> Result<(), FragmentError> {
        let parent = self.parent(reference).ok_or(FragmentError::Detached(reference))?;
        self.detach(node);
        let idx = self.child_index(parent, reference) + 1;
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(idx, node);
        Ok(())
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
            .unwrap_or(self.nodes[parent.0].children.len())
    }

    /// Remove `node` from its parent's child list, leaving it detached.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Detach every child of `node`. Used to clear a pane before a load
    /// attempt re-populates it.
    pub fn remove_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace the node's children with a single text node.
    pub fn replace_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.remove_children(node);
        let t = self.create_text(text);
        self.append_child(node, t);
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// The element's tag, or `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Option<Tag> {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => Some(*tag),
            NodeData::Text(_) => None,
        }
    }

    /// The node's own text, or `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => Some(t),
            NodeData::Element { .. } => None,
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let NodeData::Element { classes, .. } = &mut self.nodes[node.0].data {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let NodeData::Element { classes, .. } = &mut self.nodes[node.0].data {
            classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        match &self.nodes[node.0].data {
            NodeData::Element { classes, .. } => classes.iter().any(|c| c == class),
            NodeData::Text(_) => false,
        }
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        match &self.nodes[node.0].data {
            NodeData::Element { classes, .. } => classes,
            NodeData::Text(_) => &[],
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[node.0].data {
            let value = value.into();
            if let Some(entry) = attrs.iter_mut().find(|(n, _)| n == name) {
                entry.1 = value;
            } else {
                attrs.push((name.to_string(), value));
            }
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Hidden controls visibility only; hidden subtrees still contribute to
    /// [`Fragment::text_content`].
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let NodeData::Element { hidden: h, .. } = &mut self.nodes[node.0].data {
            *h = hidden;
        }
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        match &self.nodes[node.0].data {
            NodeData::Element { hidden, .. } => *hidden,
            NodeData::Text(_) => false,
        }
    }

    /// All nodes under `root` (excluding `root` itself) in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Concatenated text of all descendant text nodes, document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(t) = self.text(node) {
            out.push_str(t);
        }
        for id in self.descendants(node) {
            if let Some(t) = self.text(id) {
                out.push_str(t);
            }
        }
        out
    }

    /// True for `a` elements carrying the internal-link class.
    pub fn is_internal_link(&self, node: NodeId) -> bool {
        self.tag(node) == Some(Tag::A) && self.has_class(node, INTERNAL_LINK_CLASS)
    }

    /// Internal links under `root` in document order.
    pub fn internal_links(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.is_internal_link(id))
            .collect()
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}
