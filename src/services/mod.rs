pub mod prompt;
pub mod ranking;
pub mod server;
pub mod session;

pub use ranking::{NextComparison, RankingService};
pub use session::{ComparisonSession, Judge, SessionEnd, SessionReport};
