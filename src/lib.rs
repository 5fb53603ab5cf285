#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas_texture;
pub mod components;
pub mod encoded_image;
pub mod error;
pub mod input;
pub mod notices;
pub mod palette;
pub mod panels;
pub mod session;
pub mod solver;
pub mod stroke;
pub mod surface;

pub use app::SolverApp;
pub use encoded_image::EncodedImage;
pub use error::SurfaceError;
pub use input::{InputEvent, InputHandler, InputRouter};
pub use palette::ColorPalette;
pub use session::SolveSession;
pub use solver::{SolveRequest, SolveResponse, SolverClient, VisionModel};
pub use stroke::StrokeStyle;
pub use surface::CanvasSurface;
