mod pipeline;
mod wordlists;

pub use pipeline::{
    AspectExtractionConfig, AspectExtractor, ExtractionResult, ExtractionStrategy,
};
