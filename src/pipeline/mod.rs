//! Render pipeline
//!
//! ```text
//! Element tree → create_node (components invoked, hooks read) → surface nodes → container
//! ```
//!
//! - **materialize** - recursive conversion of one element into surface nodes
//! - **mount** - the render session: root record, full passes, resynthesis on state change

mod materialize;
pub mod mount;

pub use mount::Renderer;
