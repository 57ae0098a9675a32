pub mod guillotine;
pub mod instance;
pub mod render;
pub mod solver;
pub mod types;
