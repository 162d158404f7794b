pub mod catalog;
#[cfg(feature = "cli")]
pub mod commands;
pub mod notice;
pub mod render;
pub mod routes;
pub mod views;

pub use notice::{Notice, NoticeLevel};
pub use routes::Route;
