pub mod answer;

pub use answer::{Analysis, Answer};
