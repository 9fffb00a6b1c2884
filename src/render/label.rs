use std::sync::Arc;

use crate::{
    cards::{CardFile, Face},
    foundation::{
        core::PxSize,
        error::{TreasureError, TreasureResult},
    },
    render::{layout::LabelStyle, surface::Surface},
};

const FONT_FAMILY: &str = "sans-serif";

/// Text shown in the front card's corner badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CardLabel {
    /// Card number.
    pub card: u32,
    /// Face of that card.
    pub face: Face,
}

impl CardLabel {
    /// Label naming `card`.
    pub fn for_card(card: &CardFile) -> Self {
        Self {
            card: card.number,
            face: card.face(),
        }
    }

    /// `#21 Front`
    pub fn text(&self) -> String {
        format!("#{} {}", self.card, self.face.name())
    }
}

/// Measured extent of a text run in SVG user units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextExtent {
    /// Left edge relative to the pen position.
    pub x: f32,
    /// Top edge relative to the baseline.
    pub y: f32,
    /// Ink width.
    pub width: f32,
    /// Ink height.
    pub height: f32,
}

/// Lays out and rasterizes badges with `usvg`/`resvg` against one font database.
#[derive(Clone, Debug)]
pub struct LabelRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl LabelRenderer {
    /// Load installed fonts, mapping `sans-serif` to any available family.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        ensure_sans_serif(&mut db);
        tracing::debug!(faces = db.faces().count(), "loaded label fonts");
        Self::from_fontdb(Arc::new(db))
    }

    /// Use an existing font database.
    pub fn from_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// `true` when at least one face is loaded.
    pub fn has_fonts(&self) -> bool {
        self.fontdb.faces().next().is_some()
    }

    /// Measure `text` set at `font_size`. `None` when no font could shape it.
    pub fn measure(&self, text: &str, font_size: u32) -> TreasureResult<Option<TextExtent>> {
        let fs = font_size.max(1);
        let chars = text.chars().count() as u32 + 2;
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="0" y="{fs}" font-family="{FONT_FAMILY}" font-size="{fs}" font-weight="bold">{text}</text></svg>"#,
            w = fs * chars,
            h = fs * 2,
            text = xml_escape(text),
        );
        let tree = self.parse(&svg)?;
        Ok(find_text(tree.root()).map(|t| {
            let bbox = t.bounding_box();
            TextExtent {
                x: bbox.x(),
                y: bbox.y() - fs as f32,
                width: bbox.width(),
                height: bbox.height(),
            }
        }))
    }

    /// Rasterize a rounded badge whose box is the text extent plus padding.
    pub fn render(&self, text: &str, style: &LabelStyle) -> TreasureResult<Option<Surface>> {
        let Some(extent) = self.measure(text, style.font_size)? else {
            return Ok(None);
        };

        let w = extent.width.ceil().max(1.0) as u32 + 2 * style.pad_x;
        let h = extent.height.ceil().max(1.0) as u32 + 2 * style.pad_y;
        let text_x = style.pad_x as f32 - extent.x;
        let text_y = style.pad_y as f32 - extent.y;
        let svg = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
                r#"<rect x="0" y="0" width="{w}" height="{h}" rx="{rx}" fill="{fill}" fill-opacity="{fill_op:.4}"/>"#,
                r#"<text x="{tx:.3}" y="{ty:.3}" font-family="{family}" font-size="{fs}" font-weight="bold" fill="{ink}" fill-opacity="{ink_op:.4}">{text}</text>"#,
                "</svg>"
            ),
            w = w,
            h = h,
            rx = style.corner_radius,
            fill = style.fill.to_hex_rgb(),
            fill_op = f32::from(style.fill.a) / 255.0,
            tx = text_x,
            ty = text_y,
            family = FONT_FAMILY,
            fs = style.font_size.max(1),
            ink = style.text.to_hex_rgb(),
            ink_op = f32::from(style.text.a) / 255.0,
            text = xml_escape(text),
        );
        let tree = self.parse(&svg)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| TreasureError::render("failed to allocate label pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Surface::from_premul(PxSize::new(w, h), pixmap.take()).map(Some)
    }

    fn parse(&self, svg: &str) -> TreasureResult<usvg::Tree> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        usvg::Tree::from_str(svg, &opts)
            .map_err(|err| TreasureError::render(format!("label svg: {err}")))
    }
}

/// Point the generic sans-serif family at an installed face when the default
/// name (Arial) is not available.
fn ensure_sans_serif(db: &mut usvg::fontdb::Database) {
    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::SansSerif],
        ..Default::default()
    };
    if db.query(&query).is_some() {
        return;
    }
    let fallback = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    if let Some(name) = fallback {
        tracing::debug!(family = %name, "using fallback sans-serif family");
        db.set_sans_serif_family(name);
    }
}

fn find_text(group: &usvg::Group) -> Option<&usvg::Text> {
    group.children().iter().find_map(|child| match child {
        usvg::Node::Text(t) => Some(t.as_ref()),
        usvg::Node::Group(g) => find_text(g),
        usvg::Node::Path(_) | usvg::Node::Image(_) => None,
    })
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
