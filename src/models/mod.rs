pub mod admin;
pub mod challenge;
pub mod pagination;
pub mod plastic_log;
pub mod points_entry;
pub mod reward;
pub mod team;
pub mod user;
pub mod vendor;

pub use admin::*;
pub use challenge::*;
pub use pagination::*;
pub use plastic_log::*;
pub use points_entry::*;
pub use reward::*;
pub use team::*;
pub use user::*;
pub use vendor::*;
