pub mod counter;
pub mod leaderboard;

pub use counter::VisitCounter;
pub use leaderboard::LeaderboardService;
