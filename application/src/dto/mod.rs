mod gallery;
mod publish;

pub use gallery::*;
pub use publish::*;
