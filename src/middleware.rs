pub mod background;
pub mod validate;
