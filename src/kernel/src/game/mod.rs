//! Interactive programs that can take over the keyboard.

pub mod snake;

pub use snake::Snake;
