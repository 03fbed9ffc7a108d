pub mod broadcast;
pub mod protocol;
pub mod push;
