pub mod analyzer;
pub mod report;

pub use analyzer::{AnalysisOutcome, CommentAnalyzer};
pub use report::{AnalysisReport, CommentSentiment, SentimentStats};
