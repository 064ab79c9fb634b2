pub mod component;
pub mod computer;
pub mod peripheral;
pub mod product;
