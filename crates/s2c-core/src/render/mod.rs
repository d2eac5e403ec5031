pub mod block;
pub mod case;

pub use block::{RequestBlock, Section};
pub use case::{CaseRenderer, RenderedCase};
