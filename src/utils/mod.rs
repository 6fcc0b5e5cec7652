pub mod impact;
pub mod jwt;
pub mod password;

pub use impact::*;
pub use jwt::*;
pub use password::*;
