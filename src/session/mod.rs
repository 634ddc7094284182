pub mod gesture;
pub mod placement;
