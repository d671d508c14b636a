//! # scribe-fonts
//!
//! System-font backend for `scribe-text`.
//!
//! ```text
//! FontSpec ("Inter, Helvetica, sans-serif")
//!     │
//!     ▼
//! load_face per FontType (font-kit SystemSource)
//!     │
//!     ▼
//! SystemRasterizer ──► impl GlyphRasterizer
//!     ├── font-kit grayscale rasterization
//!     └── ttf-parser `kern` pairs (LRU memo)
//! ```

pub mod rasterizer;
pub mod registry;

pub use rasterizer::SystemRasterizer;
pub use registry::{load_face, parse_family_chain, FontError, FontSpec, LoadedFace};
