mod auth;
mod error;
mod meal_plan;
mod nutrition;
mod proxy;

pub use auth::{login, logout, me, register};
pub use error::{WebError, WebResult};
pub use meal_plan::sample_plan;
pub use nutrition::calories;
pub use proxy::proxy;
