pub mod swatch_button;
