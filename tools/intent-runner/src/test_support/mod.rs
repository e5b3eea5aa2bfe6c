//! Chain doubles shared by the unit tests.

mod fake_node;
mod recording;

pub use fake_node::FakeNode;
pub use recording::*;
