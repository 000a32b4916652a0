pub mod entity;
pub mod image;
pub mod shape;
pub mod text;
