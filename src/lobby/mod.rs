pub mod registry;
pub mod room;
