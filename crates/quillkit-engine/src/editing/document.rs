use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::Patch;
use crate::models::{MediaAttrs, MediaKind};
use crate::schema::SchemaSet;

/// Stable identifier for a node, surviving sibling edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// An embedded media instance: variant tag plus its live attribute set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaNode {
    pub kind: MediaKind,
    pub attrs: MediaAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeBody {
    Paragraph(String),
    Media(MediaNode),
}

/// A block-level unit of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    pub body: NodeBody,
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            body: NodeBody::Paragraph(text.into()),
        }
    }

    pub fn media(kind: MediaKind, attrs: MediaAttrs) -> Self {
        Self {
            id: NodeId::new(),
            body: NodeBody::Media(MediaNode { kind, attrs }),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn as_media(&self) -> Option<&MediaNode> {
        match &self.body {
            NodeBody::Media(media) => Some(media),
            NodeBody::Paragraph(_) => None,
        }
    }
}

/// A primitive document mutation. Applying one yields its inverse, which is
/// what the undo/redo stacks store.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    InsertNode { index: usize, node: Node },
    RemoveNode { index: usize },
    SetAttrs { id: NodeId, attrs: MediaAttrs },
    SetText { id: NodeId, text: String },
}

/// One transactional step: the granularity of undo/redo.
#[derive(Debug)]
pub(crate) struct Step {
    ops: Vec<Op>,
}

/// The editing surface owning the document tree.
///
/// All mutation flows through [`Document::apply`](crate::editing::Cmd); node
/// attributes are never mutated in place. Each applied command is one
/// transactional step, and every step is invertible, which is what backs
/// undo/redo. Views render from immutable reads and feed commands back.
pub struct Document {
    schema: SchemaSet,
    nodes: Vec<Node>,
    /// Caret as an insertion index into `nodes` (0..=len).
    caret: usize,
    editable: bool,
    focused: bool,
    /// Incremented on each step (enables change detection).
    version: u64,
    undo_stack: Vec<Step>,
    redo_stack: Vec<Step>,
}

impl Document {
    pub fn new(schema: SchemaSet) -> Self {
        Self {
            schema,
            nodes: Vec::new(),
            caret: 0,
            editable: true,
            focused: false,
            version: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Build a document from an HTML fragment (load or paste path).
    ///
    /// Lenient: unmatched or gate-rejected media markup is dropped, never an
    /// error.
    pub fn from_html(html: &str, schema: SchemaSet) -> Self {
        let nodes = crate::html::parse_nodes(html, &schema);
        let caret = nodes.len();
        Self {
            nodes,
            caret,
            ..Self::new(schema)
        }
    }

    /// Serialize the document back to markup.
    pub fn to_html(&self) -> String {
        crate::html::render_document(self)
    }

    pub fn schema(&self) -> &SchemaSet {
        &self.schema
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Live attribute set of a media node, if it still exists.
    pub fn media_attrs(&self, id: NodeId) -> Option<&MediaAttrs> {
        self.node(id)?.as_media().map(|m| &m.attrs)
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.nodes.len());
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Apply one transactional step and record its inverse for undo.
    pub(crate) fn commit(&mut self, ops: Vec<Op>) -> Patch {
        let (inverse, changed) = self.apply_step(Step { ops });
        self.undo_stack.push(inverse);
        self.redo_stack.clear();
        self.version += 1;
        Patch {
            changed,
            version: self.version,
        }
    }

    /// Revert the most recent step.
    pub fn undo(&mut self) -> Option<Patch> {
        if !self.editable {
            return None;
        }
        let step = self.undo_stack.pop()?;
        let (inverse, changed) = self.apply_step(step);
        self.redo_stack.push(inverse);
        self.version += 1;
        Some(Patch {
            changed,
            version: self.version,
        })
    }

    /// Re-apply the most recently undone step.
    pub fn redo(&mut self) -> Option<Patch> {
        if !self.editable {
            return None;
        }
        let step = self.redo_stack.pop()?;
        let (inverse, changed) = self.apply_step(step);
        self.undo_stack.push(inverse);
        self.version += 1;
        Some(Patch {
            changed,
            version: self.version,
        })
    }

    /// Apply a step's ops in order, collecting the inverse step (ops in
    /// reverse order) and the set of touched nodes.
    fn apply_step(&mut self, step: Step) -> (Step, Vec<NodeId>) {
        let mut inverse = Vec::with_capacity(step.ops.len());
        let mut changed = Vec::new();
        for op in step.ops {
            if let Some((inv, id)) = self.apply_op(op) {
                inverse.push(inv);
                changed.push(id);
            }
        }
        inverse.reverse();
        (Step { ops: inverse }, changed)
    }

    /// Apply a single op. Returns its inverse and the affected node, or
    /// `None` when the target no longer exists (the op is skipped).
    fn apply_op(&mut self, op: Op) -> Option<(Op, NodeId)> {
        match op {
            Op::InsertNode { index, node } => {
                let index = index.min(self.nodes.len());
                let id = node.id;
                self.nodes.insert(index, node);
                if index <= self.caret {
                    self.caret += 1;
                }
                Some((Op::RemoveNode { index }, id))
            }
            Op::RemoveNode { index } => {
                if index >= self.nodes.len() {
                    return None;
                }
                let node = self.nodes.remove(index);
                if index < self.caret {
                    self.caret -= 1;
                }
                let id = node.id;
                Some((Op::InsertNode { index, node }, id))
            }
            Op::SetAttrs { id, attrs } => {
                let node = self.nodes.iter_mut().find(|n| n.id == id)?;
                let NodeBody::Media(media) = &mut node.body else {
                    return None;
                };
                let before = std::mem::replace(&mut media.attrs, attrs);
                Some((Op::SetAttrs { id, attrs: before }, id))
            }
            Op::SetText { id, text } => {
                let node = self.nodes.iter_mut().find(|n| n.id == id)?;
                let NodeBody::Paragraph(current) = &mut node.body else {
                    return None;
                };
                let before = std::mem::replace(current, text);
                Some((Op::SetText { id, text: before }, id))
            }
        }
    }
}
