pub mod members;
pub mod weddings;
