/*!
 * Editing core: the document tree and its command-based mutation layer.
 *
 * ## Architecture
 *
 * - **Single owner of mutation**: the document tree is the one shared
 *   mutable resource, and it is only ever mutated by applying a [`Cmd`].
 *   Views and schema code read node attributes; they never write them.
 * - **Transactional steps**: every applied command is one invertible step,
 *   which is the granularity of undo/redo. Batch insertion deliberately
 *   produces one step per item.
 * - **Stable node identity**: nodes carry uuid [`NodeId`]s that survive
 *   sibling edits, so views can keep referring to "their" node while the
 *   document changes around it.
 * - **No async mutation path**: commands run synchronously on the calling
 *   thread. Asynchronous work (file upload) resolves to attribute sets
 *   before calling in.
 */

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::{Can, Chain, Cmd};
pub use document::{Document, MediaNode, Node, NodeBody, NodeId};
pub use patch::Patch;
