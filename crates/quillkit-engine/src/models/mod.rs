pub mod attrs;

pub use attrs::{AspectRatio, AttrParseError, Dimension, MediaAttrs, MediaKind, TextAlign};
