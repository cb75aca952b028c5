pub mod pdf_canvas;

pub use pdf_canvas::{FontStyle, PdfCanvas, PlacedText};
