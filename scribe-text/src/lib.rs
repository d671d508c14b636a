//! # scribe-text
//!
//! Text layout engine for bitmap-font rendering. Turns a string with
//! inline style tags into per-character metrics, lines, bounds and
//! GPU-ready quad buffers, backed by a single-channel glyph atlas.
//!
//! ## Architecture
//!
//! ```text
//! Text (edits, settings, queries)
//!     │
//!     ├──► parse_runs ──► CharacterBuilder ──► FontFamily
//!     │                                          │
//!     │                                          ├── GlyphRasterizer (font backend)
//!     │                                          └── GlyphCache ──► GlyphAtlas (shelf packing)
//!     ▼
//! horizontal_pass ──► vertical_pass ──► BoundsCache ──► GeometryBuilder
//!                                                            │
//!                                                            ▼
//!                                                    GeometryDrawData (upload)
//! ```
//!
//! - **`atlas`**: CPU-side glyph texture atlas with shelf packing.
//! - **`cache`**: Glyph lookup keyed by face, size and codepoint.
//! - **`font`**: Rasterizer plus cache, shared by every `Text`.
//! - **`parser`**: Inline `<name>…</>` style tags.
//! - **`layout`**: Word wrapping, baselines and justification.
//! - **`geometry`**: Vertex, texture-coordinate, color and index buffers.
//! - **`text`**: The public owner tying it all together.

pub mod atlas;
pub mod bounds;
pub mod cache;
pub mod character;
pub mod config;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod parser;
pub mod raster;
pub mod style;
pub mod text;
pub mod types;

// Re-exports for ergonomic use.
pub use atlas::{AtlasConfig, AtlasRegion, GlyphAtlas, PenLocation};
pub use bounds::BoundsCache;
pub use cache::{GlyphCache, GlyphKey, GlyphMetrics, RegionId};
pub use character::{Character, CharacterBuilder, CharacterKind};
pub use config::TextConfig;
pub use error::{TextError, TextResult};
pub use font::FontFamily;
pub use geometry::{GeometryBuilder, GeometryDrawData, TextVertex, QUAD_INDICES};
pub use layout::{LayoutParams, LineMetaData, WordMetaData};
pub use parser::{parse_runs, RunTags};
pub use raster::{FixedRasterizer, GlyphRasterizer, RasterizedGlyph};
pub use style::{ResolvedStyle, TextStyle, END_TAG};
pub use text::Text;
pub use types::{FontType, Justify, Rect};
