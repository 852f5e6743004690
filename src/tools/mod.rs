//! Building blocks shared by the coders
pub mod bit_stream;
pub mod node_pool;
pub mod ring_buffer;
pub mod window;
