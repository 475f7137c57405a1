use crate::editing::document::{Node, Op};
use crate::editing::{Document, NodeId, Patch};
use crate::models::{MediaAttrs, MediaKind};
use crate::schema::youtube;

/// An imperative edit operation.
///
/// Commands are the only mutation path into the document: each applied
/// command is one transactional step (the undo granularity). A command that
/// cannot run — surface not editable, empty `src`, target node gone — is a
/// no-op, never a panic or an error.
#[derive(Debug, Clone)]
pub enum Cmd {
    /// Insert exactly one media node of the given kind at the caret.
    InsertMedia { kind: MediaKind, attrs: MediaAttrs },
    /// Merge attribute fields into an existing media node. `src` in the
    /// patch is ignored: a node's source is immutable after creation.
    UpdateMediaAttrs { node: NodeId, patch: MediaAttrs },
    /// Like [`Cmd::UpdateMediaAttrs`], targeting the media node of the given
    /// kind nearest the caret.
    UpdateNearestMedia { kind: MediaKind, patch: MediaAttrs },
    /// Append typed text at the caret, running input-rule auto-conversion.
    InsertText { text: String },
    /// Remove a node from the document tree, ending its lifecycle.
    RemoveNode { node: NodeId },
    /// Give the editing surface focus.
    Focus,
    Undo,
    Redo,
}

impl Document {
    /// Apply a command as a single transactional step.
    ///
    /// Returns `None` for a no-op (nothing happened, nothing to undo).
    pub fn apply(&mut self, cmd: Cmd) -> Option<Patch> {
        match cmd {
            Cmd::InsertMedia { kind, attrs } => self.insert_media(kind, attrs),
            Cmd::UpdateMediaAttrs { node, patch } => self.update_media_attrs(node, patch),
            Cmd::UpdateNearestMedia { kind, patch } => {
                let node = self.nearest_media(kind)?;
                self.update_media_attrs(node, patch)
            }
            Cmd::InsertText { text } => self.insert_text(text),
            Cmd::RemoveNode { node } => {
                if !self.is_editable() {
                    return None;
                }
                let index = self.index_of(node)?;
                Some(self.commit(vec![Op::RemoveNode { index }]))
            }
            Cmd::Focus => {
                self.set_focused(true);
                Some(Patch {
                    changed: Vec::new(),
                    version: self.version(),
                })
            }
            Cmd::Undo => self.undo(),
            Cmd::Redo => self.redo(),
        }
    }

    /// Whether a command would apply, without executing it. Backs the
    /// enabled/disabled state of UI controls.
    pub fn can_apply(&self, cmd: &Cmd) -> bool {
        match cmd {
            Cmd::InsertMedia { kind, attrs } => {
                self.is_editable()
                    && attrs.has_src()
                    && self.schema().get(*kind).is_some_and(|spec| {
                        !spec.options.gate_commands
                            || spec.options.gate.allows(attrs.src.as_deref())
                    })
            }
            Cmd::UpdateMediaAttrs { node, .. } => {
                self.is_editable() && self.media_attrs(*node).is_some()
            }
            Cmd::UpdateNearestMedia { kind, .. } => {
                self.is_editable() && self.nearest_media(*kind).is_some()
            }
            Cmd::InsertText { .. } => self.is_editable(),
            Cmd::RemoveNode { node } => self.is_editable() && self.node(*node).is_some(),
            Cmd::Focus => true,
            Cmd::Undo => self.is_editable() && self.can_undo(),
            Cmd::Redo => self.is_editable() && self.can_redo(),
        }
    }

    /// Start a command chain: `doc.chain().focus().set_video(attrs).run()`.
    pub fn chain(&mut self) -> Chain<'_> {
        Chain {
            doc: self,
            cmds: Vec::new(),
        }
    }

    /// Availability queries mirroring [`Document::chain`]:
    /// `doc.can().set_video(attrs)`.
    pub fn can(&self) -> Can<'_> {
        Can { doc: self }
    }

    /// Insert a batch of already-uploaded media, in order, one transactional
    /// step per item — so undo reverts only the most recent insertion.
    ///
    /// The upload callback boundary is external: by the time this is called,
    /// files have been resolved to attribute sets. Returns how many items
    /// were inserted.
    pub fn insert_uploaded(&mut self, kind: MediaKind, batch: Vec<MediaAttrs>) -> usize {
        let mut inserted = 0;
        for attrs in batch {
            if self.chain().focus().insert_media(kind, attrs).run() {
                inserted += 1;
            }
        }
        inserted
    }

    fn insert_media(&mut self, kind: MediaKind, attrs: MediaAttrs) -> Option<Patch> {
        if !self.is_editable() || !attrs.has_src() {
            return None;
        }
        let spec = self.schema().get(kind)?;
        if spec.options.gate_commands && !spec.options.gate.allows(attrs.src.as_deref()) {
            return None;
        }
        let mut attrs = attrs.with_defaults(&spec.defaults);
        if kind == MediaKind::Youtube {
            attrs.src = attrs.src.map(|src| youtube::canonical_src(&src));
        }
        let index = self.caret();
        let ops = vec![Op::InsertNode {
            index,
            node: Node::media(kind, attrs),
        }];
        Some(self.commit(ops))
    }

    fn update_media_attrs(&mut self, node: NodeId, mut patch: MediaAttrs) -> Option<Patch> {
        if !self.is_editable() {
            return None;
        }
        // src is immutable after creation.
        patch.src = None;
        let current = self.media_attrs(node)?;
        let merged = current.merge(&patch);
        if merged == *current {
            return None;
        }
        Some(self.commit(vec![Op::SetAttrs {
            id: node,
            attrs: merged,
        }]))
    }

    fn insert_text(&mut self, text: String) -> Option<Patch> {
        if !self.is_editable() || text.is_empty() {
            return None;
        }

        let mut ops = Vec::new();
        // Append into the paragraph just before the caret, or open a new one.
        let (para_index, para_id, base_text) = match self.caret().checked_sub(1).and_then(|i| {
            let node = &self.nodes()[i];
            match &node.body {
                crate::editing::NodeBody::Paragraph(text) => Some((i, node.id(), text.clone())),
                _ => None,
            }
        }) {
            Some(found) => found,
            None => {
                let para = Node::paragraph("");
                let id = para.id();
                let index = self.caret();
                ops.push(Op::InsertNode { index, node: para });
                (index, id, String::new())
            }
        };
        let new_text = format!("{base_text}{text}");

        // Input-rule auto-conversion: first spec whose rule matches and whose
        // gate admits the source claims the reference. A gate-rejected source
        // leaves the raw text in place.
        let conversion = self
            .schema()
            .iter()
            .filter_map(|spec| spec.input_rule.as_ref().map(|rule| (spec, rule)))
            .find_map(|(spec, rule)| {
                rule.try_match(&new_text, &spec.options)
                    .map(|(range, attrs)| {
                        (spec.kind, range, attrs.with_defaults(&spec.defaults))
                    })
            });

        match conversion {
            Some((kind, range, attrs)) => {
                let remaining = format!("{}{}", &new_text[..range.start], &new_text[range.end..]);
                ops.push(Op::SetText {
                    id: para_id,
                    text: remaining,
                });
                ops.push(Op::InsertNode {
                    index: para_index + 1,
                    node: Node::media(kind, attrs),
                });
            }
            None => ops.push(Op::SetText {
                id: para_id,
                text: new_text,
            }),
        }
        Some(self.commit(ops))
    }

    /// The media node of the given kind nearest the caret, searching
    /// backwards first.
    fn nearest_media(&self, kind: MediaKind) -> Option<NodeId> {
        let caret = self.caret();
        let before = self.nodes()[..caret]
            .iter()
            .rev()
            .find(|n| n.as_media().is_some_and(|m| m.kind == kind));
        let after = self.nodes()[caret..]
            .iter()
            .find(|n| n.as_media().is_some_and(|m| m.kind == kind));
        before.or(after).map(|n| n.id())
    }
}

/// Builder for applying several commands in sequence.
///
/// `run` applies every queued command and reports whether all of them
/// applied; a no-op in the middle does not stop the rest.
pub struct Chain<'a> {
    doc: &'a mut Document,
    cmds: Vec<Cmd>,
}

impl<'a> Chain<'a> {
    pub fn focus(self) -> Self {
        self.push(Cmd::Focus)
    }

    pub fn insert_media(self, kind: MediaKind, attrs: MediaAttrs) -> Self {
        self.push(Cmd::InsertMedia { kind, attrs })
    }

    pub fn set_image(self, attrs: MediaAttrs) -> Self {
        self.push(Cmd::InsertMedia {
            kind: MediaKind::Image,
            attrs,
        })
    }

    pub fn set_video(self, attrs: MediaAttrs) -> Self {
        self.push(Cmd::InsertMedia {
            kind: MediaKind::Video,
            attrs,
        })
    }

    pub fn set_youtube_video(self, attrs: MediaAttrs) -> Self {
        self.push(Cmd::InsertMedia {
            kind: MediaKind::Youtube,
            attrs,
        })
    }

    pub fn update_youtube_video(self, patch: MediaAttrs) -> Self {
        self.push(Cmd::UpdateNearestMedia {
            kind: MediaKind::Youtube,
            patch,
        })
    }

    pub fn update_media_attrs(self, node: NodeId, patch: MediaAttrs) -> Self {
        self.push(Cmd::UpdateMediaAttrs { node, patch })
    }

    pub fn insert_text(self, text: impl Into<String>) -> Self {
        self.push(Cmd::InsertText { text: text.into() })
    }

    pub fn remove_node(self, node: NodeId) -> Self {
        self.push(Cmd::RemoveNode { node })
    }

    pub fn undo(self) -> Self {
        self.push(Cmd::Undo)
    }

    pub fn redo(self) -> Self {
        self.push(Cmd::Redo)
    }

    pub fn run(self) -> bool {
        let Chain { doc, cmds } = self;
        let mut all_applied = true;
        for cmd in cmds {
            all_applied &= doc.apply(cmd).is_some();
        }
        all_applied
    }

    fn push(mut self, cmd: Cmd) -> Self {
        self.cmds.push(cmd);
        self
    }
}

/// Read-only availability queries for UI enablement.
pub struct Can<'a> {
    doc: &'a Document,
}

impl<'a> Can<'a> {
    pub fn insert_media(&self, kind: MediaKind, attrs: MediaAttrs) -> bool {
        self.doc.can_apply(&Cmd::InsertMedia { kind, attrs })
    }

    pub fn set_image(&self, attrs: MediaAttrs) -> bool {
        self.insert_media(MediaKind::Image, attrs)
    }

    pub fn set_video(&self, attrs: MediaAttrs) -> bool {
        self.insert_media(MediaKind::Video, attrs)
    }

    pub fn set_youtube_video(&self, attrs: MediaAttrs) -> bool {
        self.insert_media(MediaKind::Youtube, attrs)
    }

    pub fn update_youtube_video(&self, patch: MediaAttrs) -> bool {
        self.doc.can_apply(&Cmd::UpdateNearestMedia {
            kind: MediaKind::Youtube,
            patch,
        })
    }

    pub fn undo(&self) -> bool {
        self.doc.can_apply(&Cmd::Undo)
    }

    pub fn redo(&self) -> bool {
        self.doc.can_apply(&Cmd::Redo)
    }
}
