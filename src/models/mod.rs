pub mod loader;
pub mod recommender;
pub mod rules;
