//! View models that drive list screens without the HTTP layer.

pub mod list;
