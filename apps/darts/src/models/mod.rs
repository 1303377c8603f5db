pub mod brand;
pub mod document;
pub mod segment;
pub mod variant;
