//! UI layer for the console view: view state, rendering and the input loop.

pub mod app;
pub mod console;
pub mod render;
