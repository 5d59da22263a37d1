pub mod animation;
pub mod assets;
pub mod camera;
pub mod core;
pub mod layout;
pub mod loading;
pub mod picking;
pub mod render;
pub mod scene;
pub mod systems;
