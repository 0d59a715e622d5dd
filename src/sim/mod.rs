pub mod event;
pub mod scene;
pub mod scroll;
pub mod state;
pub mod step;
