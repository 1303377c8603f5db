// Document handling: raw upload bytes -> normalized text.
// Format decoding lives in extract.rs, text cleanup in normalize.rs.

pub mod extract;
pub mod normalize;
