// Judging domain module
// Rubrics, judge assignments, scores and leaderboard aggregation

pub mod assignment;
pub mod leaderboard;
pub mod rubric;
pub mod score;

pub use assignment::{plan_assignments, JudgeAssignment};
pub use leaderboard::{build_leaderboard, LeaderboardEntry};
pub use rubric::{CriteriaScores, Criterion, Rubric};
pub use score::Score;
