pub mod compose;
pub mod fetch;
