pub mod destination;
pub mod tourist;
pub mod visit;

pub use destination::{Destination, NewDestination};
pub use tourist::{NewTourist, Tourist};
pub use visit::{NewVisit, Visit};
