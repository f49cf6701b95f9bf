//! Client-side view state: pagination/filter store and input debouncing.

pub mod debounce;
pub mod table;
