pub use vectors::{argmax, vector_max};

mod vectors;
