pub mod classify;
pub mod description;
pub mod error;
pub mod layout;

pub use classify::{classify_from_root, classify_system, ClassifiedSystem};
pub use description::{ExoType, SpatialRecord, Subsystem, SystemDescription};
pub use error::{DescriptionError, DescriptionResult};
pub use layout::{prepare_system, LayoutConfig, SystemLayout};
