pub mod elo;
pub mod ranking;
pub mod selector;
pub mod store;
pub mod types;
pub mod updater;

pub use ranking::RankingQuery;
pub use selector::{PairSelector, StorePair};
pub use store::{MemoryRatingStore, RatingStore};
pub use types::{Comparison, ComparisonOutcome, RankedStore, RankingProgress, Rating, StoreId, UserId};
pub use updater::RatingUpdater;
