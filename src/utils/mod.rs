pub mod image;
pub mod validation;
