pub mod aggregation;
pub mod query;
pub mod seeder;

pub use aggregation::AggregationService;
pub use query::{PageRequest, QueryService};
pub use seeder::{SeedError, SeedOutcome, Seeder};
