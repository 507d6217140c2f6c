pub mod boat_repo;
pub mod error;
pub mod memory;
pub mod user_repo;

pub use boat_repo::{BoatRepo, BoatRow, NewBoat, PgBoatRepo};
pub use error::{RepoError, RepoResult};
pub use user_repo::{PgUserRepo, UserAuthData, UserRepo};
