mod model;
pub mod repo;

pub use model::{CompleteProfile, Profile};
pub use repo::{PgProfileStore, ProfileStore};
