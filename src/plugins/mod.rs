pub mod grid_navigation;

pub use grid_navigation::*;
