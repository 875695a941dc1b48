pub mod analyzer;
pub mod answer_parser;
pub mod data_uri;
pub mod prompt;
pub mod providers;
pub mod scratch;

pub use analyzer::{AnalyzeError, ImageAnalyzer};
pub use data_uri::{DataUri, DataUriError};
pub use scratch::{ScratchImage, ScratchSpace};
