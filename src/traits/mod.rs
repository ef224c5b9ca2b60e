pub mod items;
pub mod model;
