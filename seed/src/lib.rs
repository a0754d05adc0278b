//! Development data seeding for the student organization database.
//!
//! [`seeder::Seeder`] drives the four seeding steps against the
//! repositories in `common`; [`generator::DataGenerator`] supplies the
//! random values so tests can substitute deterministic ones.

pub mod error;
pub mod generator;
pub mod seeder;

pub use error::{SeedError, SeedResult};
pub use generator::{DataGenerator, FakeDataGenerator};
pub use seeder::{
    SeedPlan, SeedRelations, SeedRepositories, SeedSummary, Seeder, Step, StepReport,
};
