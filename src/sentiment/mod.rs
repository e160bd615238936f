pub mod classifier;
pub mod lemma;
pub mod normalize;
pub mod pipeline;

pub use classifier::{ModelInfo, Sentiment, SentimentClassifier};
pub use normalize::normalize;
