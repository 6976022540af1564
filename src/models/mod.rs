//! Data models for AssetFlow

pub mod asset;
pub mod asset_return;
pub mod assignment;
pub mod category;
pub mod enums;
pub mod location;
pub mod sequence;
pub mod user;

// Re-export commonly used types
pub use asset::{Asset, NewAsset, UpdateAsset};
pub use asset_return::AssetReturn;
pub use assignment::{Assignment, NewAssignment, UpdateAssignment};
pub use category::Category;
pub use enums::{AssetState, AssignmentStatus, ReturnState, Role};
pub use location::Location;
pub use sequence::SequenceCounter;
pub use user::{CurrentUser, User};
