pub mod dom;
pub mod parse;
pub mod render;

pub use dom::{HtmlElement, HtmlNode};
pub use parse::parse_nodes;
pub use render::render_document;
