use crate::foundation::core::{PxPoint, PxRect, PxSize, Rgba8};

/// Fixed geometry and styling of a treasure layout.
///
/// Offsets are relative to the anchor card (back #1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSpec {
    /// Every card is resampled to this size before placement.
    pub card: PxSize,
    /// Back #2 relative to back #1.
    pub back2_offset: PxPoint,
    /// Back #3 relative to back #1.
    pub back3_offset: PxPoint,
    /// Front relative to back #1.
    pub front_offset: PxPoint,
    /// Region of the reference-sized back card shown in the side panel.
    pub crop: PxRect,
    /// Empty border around everything.
    pub outer_margin: u32,
    /// Space between the stacked cluster and the side panel.
    pub right_gap: u32,
    /// Tabletop color.
    pub background: Rgba8,
    /// Drop shadow under cards and the matte.
    pub shadow: ShadowStyle,
    /// Corner radius of card shadows.
    pub card_corner_radius: u32,
    /// Matte border around the cropped card.
    pub matte_pad: u32,
    /// Corner radius of the matte shadow.
    pub matte_corner_radius: u32,
    /// Matte fill.
    pub matte_color: Rgba8,
    /// Front card badge.
    pub label: LabelStyle,
}

/// Soft drop shadow painted beneath every card and the matte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowStyle {
    /// Displacement from the element.
    pub offset: PxPoint,
    /// Gaussian sigma in pixels.
    pub blur: u32,
    /// Opacity of the darkest part.
    pub alpha: u8,
}

/// Corner badge drawn over the front card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelStyle {
    /// Text size in pixels.
    pub font_size: u32,
    /// Horizontal space between text and box edge.
    pub pad_x: u32,
    /// Vertical space between text and box edge.
    pub pad_y: u32,
    /// Distance from the front card's right and bottom edges.
    pub inset: u32,
    /// Box corner radius.
    pub corner_radius: u32,
    /// Box color.
    pub fill: Rgba8,
    /// Text color.
    pub text: Rgba8,
}

impl LayoutSpec {
    /// The tabletop layout for full-size 744x1039 card scans.
    pub const STANDARD: LayoutSpec = LayoutSpec {
        card: PxSize::new(744, 1039),
        back2_offset: PxPoint::new(0, 578),
        back3_offset: PxPoint::new(-234, 144),
        front_offset: PxPoint::new(0, 144),
        crop: PxRect::new(238, 233, 738, 575),
        outer_margin: 40,
        right_gap: 60,
        background: Rgba8::opaque(16, 59, 44),
        shadow: ShadowStyle {
            offset: PxPoint::new(10, 10),
            blur: 10,
            alpha: 90,
        },
        card_corner_radius: 28,
        matte_pad: 16,
        matte_corner_radius: 20,
        matte_color: Rgba8::opaque(238, 234, 216),
        label: LabelStyle {
            font_size: 28,
            pad_x: 14,
            pad_y: 8,
            inset: 18,
            corner_radius: 10,
            fill: Rgba8 {
                r: 12,
                g: 20,
                b: 16,
                a: 200,
            },
            text: Rgba8::opaque(240, 236, 220),
        },
    };

    /// Resolve every position and the canvas size. Pure integer geometry.
    pub fn plan(&self) -> LayoutPlan {
        let margin = self.outer_margin as i32;
        let anchor = PxPoint::new(margin + self.back3_offset.x.abs(), margin);

        let back1 = anchor;
        let back2 = anchor.offset(self.back2_offset.x, self.back2_offset.y);
        let back3 = anchor.offset(self.back3_offset.x, self.back3_offset.y);
        let front = anchor.offset(self.front_offset.x, self.front_offset.y);

        let cluster = [back1, back2, back3, front]
            .into_iter()
            .map(|p| PxRect::at(p, self.card))
            .reduce(PxRect::union)
            .unwrap_or(PxRect::at(anchor, self.card));

        let crop = self.crop.size();
        let panel = PxPoint::new(cluster.right + self.right_gap as i32, margin);
        let matte = PxRect::at(
            panel,
            PxSize::new(crop.width + 2 * self.matte_pad, crop.height + 2 * self.matte_pad),
        );
        let crop_origin = panel.offset(self.matte_pad as i32, self.matte_pad as i32);

        let width = panel.x + crop.width as i32 + margin;
        let height = (cluster.bottom + margin).max(panel.y + crop.height as i32 + margin);

        LayoutPlan {
            back1,
            back2,
            back3,
            front,
            cluster,
            matte,
            crop_origin,
            canvas: PxSize::new(width.max(1) as u32, height.max(1) as u32),
        }
    }

    /// `true` when the crop box lies inside a reference-sized card.
    pub fn crop_fits_card(&self) -> bool {
        PxRect::at(PxPoint::default(), self.card).contains_rect(self.crop)
            && self.crop.width() > 0
            && self.crop.height() > 0
    }
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Absolute placement of every element of one layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Anchor card.
    pub back1: PxPoint,
    /// Card below the anchor.
    pub back2: PxPoint,
    /// Card left of the anchor.
    pub back3: PxPoint,
    /// Revealed card.
    pub front: PxPoint,
    /// Bounds of the four stacked cards.
    pub cluster: PxRect,
    /// Matte behind the cropped panel card.
    pub matte: PxRect,
    /// Top-left corner of the cropped card inside the matte.
    pub crop_origin: PxPoint,
    /// Output size.
    pub canvas: PxSize,
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
