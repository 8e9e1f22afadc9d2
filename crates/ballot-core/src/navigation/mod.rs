pub mod notices;
pub mod routes;

pub use notices::{Notice, NoticeKind};
pub use routes::Route;
