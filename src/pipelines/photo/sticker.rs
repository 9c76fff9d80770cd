// SPDX-License-Identifier: GPL-3.0-only

//! Sticker glyph rasterization
//!
//! Glyphs (usually emoji) are laid out as SVG text and rendered with resvg
//! against the system font database, centred on a square canvas twice the
//! font size.

use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Turns a glyph into an RGBA image with the glyph centred on it
pub trait GlyphRasterizer: Send + Sync {
    /// Rasterize `glyph` at `size_px`.
    ///
    /// Returns `None` when no font can draw the glyph.
    fn rasterize(&self, glyph: &str, size_px: u32) -> Option<RgbaImage>;

    /// Load whatever the first rasterization would otherwise load lazily
    fn warm_up(&self) {}
}

/// resvg-backed rasterizer using system fonts
pub struct SvgGlyphRasterizer {
    font_family: String,
    fontdb: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl SvgGlyphRasterizer {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            fontdb: OnceLock::new(),
        }
    }

    /// Loading system fonts takes a while, so it happens on first use
    fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                debug!(faces = db.len(), "Loaded system fonts for stickers");
                Arc::new(db)
            })
            .clone()
    }

    fn svg_document(&self, glyph: &str, size_px: u32) -> String {
        let canvas = size_px * 2;
        let centre = size_px;
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{canvas}" height="{canvas}" viewBox="0 0 {canvas} {canvas}"><text x="{centre}" y="{centre}" font-family="{family}" font-size="{size_px}" text-anchor="middle" dominant-baseline="central">{text}</text></svg>"#,
            family = escape_xml(&self.font_family),
            text = escape_xml(glyph),
        )
    }
}

impl GlyphRasterizer for SvgGlyphRasterizer {
    fn warm_up(&self) {
        self.fontdb();
    }

    fn rasterize(&self, glyph: &str, size_px: u32) -> Option<RgbaImage> {
        if glyph.is_empty() || size_px == 0 {
            return None;
        }

        let opts = usvg::Options {
            fontdb: self.fontdb(),
            ..Default::default()
        };
        let svg = self.svg_document(glyph, size_px);
        let tree = match usvg::Tree::from_str(&svg, &opts) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(glyph, error = %e, "Failed to lay out sticker glyph");
                return None;
            }
        };

        let canvas = size_px * 2;
        let mut pixmap = tiny_skia::Pixmap::new(canvas, canvas)?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let mut image = RgbaImage::new(canvas, canvas);
        let mut painted = false;
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            if c.alpha() > 0 {
                painted = true;
            }
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }

        if !painted {
            debug!(glyph, "No font could draw the sticker glyph");
            return None;
        }
        Some(image)
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_xml("🔥"), "🔥");
    }

    #[test]
    fn test_document_centres_glyph() {
        let rasterizer = SvgGlyphRasterizer::new("serif");
        let svg = rasterizer.svg_document("<3", 150);
        assert!(svg.contains(r#"width="300""#));
        assert!(svg.contains(r#"x="150" y="150""#));
        assert!(svg.contains(r#"font-size="150""#));
        assert!(svg.contains("&lt;3"));
    }

    #[test]
    fn test_empty_glyph_draws_nothing() {
        let rasterizer = SvgGlyphRasterizer::new("serif");
        assert!(rasterizer.rasterize("", 150).is_none());
        assert!(rasterizer.rasterize("x", 0).is_none());
    }
}
