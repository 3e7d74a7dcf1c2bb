//! Binary layout walking for native information buffers

mod reader;

pub use reader::{BufferView, PointerWidth};
