//! Route handlers.

pub mod linebot;
pub mod photo_slide;
