pub mod animator;
pub mod app;
pub mod audio;
pub mod config;
pub mod playback;
pub mod track;
pub mod view;
