pub mod app;
pub mod clock;
pub mod config;
pub mod logo;
pub mod material;
pub mod params;
pub mod pattern;
pub mod render;
pub mod surface;
pub mod terminal;
