//! Command implementations for the doctree CLI

mod find;
mod list;
mod preview;
mod render;
mod tree;
pub mod window;

pub use find::execute as find;
pub use list::execute as list_documents;
pub use preview::execute as preview;
pub use render::execute as render;
pub use tree::execute as show_tree;
pub use window::execute as show_window;

pub use find::FindRequest;
pub use window::WindowRequest;
