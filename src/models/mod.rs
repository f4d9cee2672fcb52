pub mod workout;
pub mod analysis;

pub use workout::WorkoutSummary;
pub use analysis::{
  AnalysisDetail, AnalysisHistoryItem, AnalysisScores, CoachPlan, HistoryPage, Pagination,
};
