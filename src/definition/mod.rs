pub mod artifact;
pub mod check;
pub mod document;
pub mod layout;
pub mod node_data;

pub use artifact::*;
pub use check::*;
pub use document::*;
pub use layout::*;
pub use node_data::*;
