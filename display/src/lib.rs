pub use display::Display;

mod display;
