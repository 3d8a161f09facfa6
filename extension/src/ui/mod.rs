/// UI module exports

pub mod components;
pub mod content;
pub mod popup;
pub mod viewer;
