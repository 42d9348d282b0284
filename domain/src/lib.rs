pub mod catalog;
pub mod entity;
pub mod error;
pub mod port;
pub mod route;

pub use catalog::*;
pub use entity::*;
pub use error::*;
pub use port::*;
pub use route::Route;
