mod bounded_buffer;
mod event;

pub use bounded_buffer::BoundedBuffer;
pub use event::*;
