pub mod store;

pub use store::{AnalysisStore, AnalysisSummary, StoredAnalysis};
