pub mod files;
pub mod id;
pub mod mock;
pub mod model;

pub use id::LayerId;
pub use model::*;
