use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};
use rtsim_cache::label;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tiny_skia::{Pixmap, PremultipliedColorU8};

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loads the configured font, falling back to common system locations.
pub fn load_font(preferred: Option<&Path>) -> Option<FontVec> {
    let candidates = preferred
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(Path::new));
    for path in candidates {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                log::info!("using font {}", path.display());
                return Some(font);
            }
            Err(e) => log::warn!("{} is not a usable font: {}", path.display(), e),
        }
    }
    log::warn!("no font found, text will not be drawn");
    None
}

/// Rasterises one line of text into a tight, transparent pixmap.
pub fn render_text_pixmap<F: Font>(text: &str, size_px: f32, font: &F, rgba: [u8; 4]) -> Option<Pixmap> {
    let scale = PxScale::from(size_px);
    let sf = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::with_capacity(text.len());
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let w = pen_x.ceil().max(1.0) as u32;
    let h = (sf.ascent() - sf.descent()).ceil().max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;
    let stride = w as usize;
    let dst = pm.pixels_mut();

    for g in glyphs {
        let Some(outline) = font.outline_glyph(g) else {
            continue;
        };
        let b = outline.px_bounds();
        outline.draw(|x, y, cov| {
            let ix = x as i32 + b.min.x as i32;
            let iy = y as i32 + b.min.y as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;
            let alpha = (cov.clamp(0.0, 1.0) * rgba[3] as f32) as u8;
            if alpha <= dst[i].alpha() {
                return;
            }
            let premul = |c: u8| (c as u16 * alpha as u16 / 255) as u8;
            if let Some(px) =
                PremultipliedColorU8::from_rgba(premul(rgba[0]), premul(rgba[1]), premul(rgba[2]), alpha)
            {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}

/// Rendered labels keyed by interned label id, size and colour
pub struct TextCache {
    font: FontVec,
    map: HashMap<(usize, u32, [u8; 4]), Arc<Pixmap>>,
}

impl TextCache {
    pub fn new(font: FontVec) -> Self {
        Self {
            font,
            map: HashMap::new(),
        }
    }

    pub fn get_or_render(&mut self, label_id: usize, size_px: f32, rgba: [u8; 4]) -> Option<Arc<Pixmap>> {
        let key = (label_id, size_px.to_bits(), rgba);
        if let Some(p) = self.map.get(&key) {
            return Some(Arc::clone(p));
        }
        let text = label(label_id)?;
        let pm = Arc::new(render_text_pixmap(&text, size_px, &self.font, rgba)?);
        self.map.insert(key, Arc::clone(&pm));
        Some(pm)
    }

    /// Rasterises text that is not worth keeping, such as a per-trial
    /// measurement.
    pub fn render_uncached(&self, text: &str, size_px: f32, rgba: [u8; 4]) -> Option<Pixmap> {
        render_text_pixmap(text, size_px, &self.font, rgba)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_preferred_font_falls_through() {
        let with_bad_path = load_font(Some(Path::new("/nonexistent/font.ttf")));
        assert_eq!(with_bad_path.is_some(), load_font(None).is_some());
    }

    #[test]
    fn unreadable_font_file_is_skipped() {
        let path = std::env::temp_dir().join("rtsim-not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let font = load_font(Some(&path));
        std::fs::remove_file(&path).ok();
        assert_eq!(font.is_some(), load_font(None).is_some());
    }

    #[test]
    fn rasterised_text_has_coverage() {
        let Some(font) = load_font(None) else {
            return;
        };
        let pm = render_text_pixmap("Exit", 20.0, &font, [0, 0, 0, 255]).unwrap();
        assert!(pm.width() > pm.height() && pm.height() >= 15);
        assert!(pm.pixels().iter().any(|p| p.alpha() > 128));
        assert!(pm.pixels().iter().any(|p| p.alpha() == 0));

        let blank = render_text_pixmap("   ", 20.0, &font, [0, 0, 0, 255]).unwrap();
        assert!(blank.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn uncached_text_matches_cached_rendering() {
        let Some(font) = load_font(None) else {
            return;
        };
        let mut cache = TextCache::new(font);
        let id = rtsim_cache::intern_label("New Test");
        let cached = cache.get_or_render(id, 20.0, [0, 0, 0, 255]).unwrap();
        let uncached = cache.render_uncached("New Test", 20.0, [0, 0, 0, 255]).unwrap();
        assert_eq!(cached.data(), uncached.data());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cached_labels_are_reused() {
        let Some(font) = load_font(None) else {
            return;
        };
        let mut cache = TextCache::new(font);
        let id = rtsim_cache::intern_label("Reaction Time Simulation");
        let a = cache.get_or_render(id, 32.0, [0, 0, 0, 255]).unwrap();
        let b = cache.get_or_render(id, 32.0, [0, 0, 0, 255]).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(a.width() > a.height());
    }
}
