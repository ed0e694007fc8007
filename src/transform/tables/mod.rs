//! Built-in table transforms

mod members;
mod packages;

pub use members::MembersTransform;
pub use packages::PackagesTransform;
