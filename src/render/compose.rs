use std::sync::OnceLock;

use image::RgbaImage;

use crate::{
    assets::decode::{crop_card, load_card},
    foundation::{
        core::{PxPoint, Rgba8},
        error::{TreasureError, TreasureResult},
    },
    render::{
        label::{CardLabel, LabelRenderer},
        layout::{LayoutPlan, LayoutSpec},
        shadow::Shadow,
        surface::Surface,
    },
    select::{Role, Selection},
};

/// Per-render options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComposeOpts {
    /// Badge drawn in the lower-right corner of the front card.
    pub label: Option<CardLabel>,
}

impl ComposeOpts {
    /// Label the front card of `selection` with its number and face.
    pub fn labeled(selection: &Selection) -> Self {
        Self {
            label: Some(CardLabel::for_card(&selection.front)),
        }
    }
}

/// Turns a [`Selection`] into one composited canvas.
///
/// Holds the layout constants and the lazily loaded font database for labels,
/// so repeated renders share both.
#[derive(Debug, Default)]
pub struct Compositor {
    spec: LayoutSpec,
    labels: OnceLock<LabelRenderer>,
}

impl Compositor {
    /// Compositor for `spec`; fonts load on first labeled render.
    pub fn new(spec: LayoutSpec) -> Self {
        Self {
            spec,
            labels: OnceLock::new(),
        }
    }

    /// Use `labels` instead of loading system fonts on first labeled render.
    pub fn with_label_renderer(spec: LayoutSpec, labels: LabelRenderer) -> Self {
        Self {
            spec,
            labels: OnceLock::from(labels),
        }
    }

    /// Layout in use.
    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    /// Render the full-resolution canvas.
    ///
    /// All five images are decoded before anything is painted, so a bad file
    /// yields an error and never a partial canvas. Output depends only on the
    /// inputs.
    #[tracing::instrument(skip_all, fields(status = %selection.status_line()))]
    pub fn compose(&self, selection: &Selection, opts: &ComposeOpts) -> TreasureResult<RgbaImage> {
        let spec = &self.spec;
        if !spec.crop_fits_card() {
            return Err(TreasureError::render(format!(
                "crop box {:?} does not fit a {}x{} card",
                spec.crop, spec.card.width, spec.card.height
            )));
        }
        let plan = spec.plan();

        let load = |role: Role| load_card(selection.path(role), spec.card);
        let back1 = load(Role::Back1)?;
        let back2 = load(Role::Back2)?;
        let back3 = load(Role::Back3)?;
        let front = load(Role::Front)?;
        let crop_src = load(Role::CropBack)?;
        let panel = crop_card(&crop_src, spec.crop)?;

        let mut canvas = Surface::filled(plan.canvas, spec.background)?;
        self.paint_cluster(&mut canvas, &plan, [&back1, &back2, &back3, &front])?;
        self.paint_panel(&mut canvas, &plan, &panel)?;
        if let Some(label) = opts.label {
            self.paint_label(&mut canvas, &plan, label)?;
        }

        let out = canvas.into_rgba_image()?;
        tracing::info!(
            width = out.width(),
            height = out.height(),
            "composed treasure"
        );
        Ok(out)
    }

    fn shadow_color(&self) -> Rgba8 {
        Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: self.spec.shadow.alpha,
        }
    }

    /// Back #1, back #2, back #3, then the front, each over its own shadow.
    fn paint_cluster(
        &self,
        canvas: &mut Surface,
        plan: &LayoutPlan,
        cards: [&RgbaImage; 4],
    ) -> TreasureResult<()> {
        let spec = &self.spec;
        let shadow = Shadow::new(spec.card, spec.card_corner_radius, spec.shadow.blur)?;
        let positions = [plan.back1, plan.back2, plan.back3, plan.front];
        for (card, at) in cards.into_iter().zip(positions) {
            canvas.draw_mask(
                shadow.mask(),
                shadow.origin_for(at, &spec.shadow),
                self.shadow_color(),
            );
            canvas.draw_over(&Surface::from_rgba_image(card), at);
        }
        Ok(())
    }

    fn paint_panel(
        &self,
        canvas: &mut Surface,
        plan: &LayoutPlan,
        panel: &RgbaImage,
    ) -> TreasureResult<()> {
        let spec = &self.spec;
        let matte_at = PxPoint::new(plan.matte.left, plan.matte.top);
        let shadow = Shadow::new(plan.matte.size(), spec.matte_corner_radius, spec.shadow.blur)?;
        canvas.draw_mask(
            shadow.mask(),
            shadow.origin_for(matte_at, &spec.shadow),
            self.shadow_color(),
        );
        canvas.fill_rect(plan.matte, spec.matte_color);
        canvas.draw_over(&Surface::from_rgba_image(panel), plan.crop_origin);
        Ok(())
    }

    fn paint_label(
        &self,
        canvas: &mut Surface,
        plan: &LayoutPlan,
        label: CardLabel,
    ) -> TreasureResult<()> {
        let spec = &self.spec;
        let renderer = self.labels.get_or_init(LabelRenderer::with_system_fonts);
        let Some(badge) = renderer.render(&label.text(), &spec.label)? else {
            tracing::warn!(text = %label.text(), "no font available, skipping label");
            return Ok(());
        };
        let size = badge.size();
        let inset = spec.label.inset as i32;
        let at = plan.front.offset(
            spec.card.width as i32 - inset - size.width as i32,
            spec.card.height as i32 - inset - size.height as i32,
        );
        canvas.draw_over(&badge, at);
        Ok(())
    }
}

/// Render `selection` with the standard layout.
pub fn compose(selection: &Selection, opts: &ComposeOpts) -> TreasureResult<RgbaImage> {
    compose_with(&LayoutSpec::STANDARD, selection, opts)
}

/// Render `selection` with a custom layout.
pub fn compose_with(
    spec: &LayoutSpec,
    selection: &Selection,
    opts: &ComposeOpts,
) -> TreasureResult<RgbaImage> {
    Compositor::new(*spec).compose(selection, opts)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
