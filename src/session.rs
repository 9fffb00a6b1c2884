//! Controller context shared by every front end.
//!
//! A [`TreasureSession`] owns the current folder, the snapshot scanned from it
//! and the last rendered treasure. All mutation goes through its methods, so a
//! failed draw or folder change never leaves it half-updated.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use rand::Rng;

use crate::{
    cards::{CardIndex, Deck, DeckSummary, scan_folder},
    foundation::error::{TreasureError, TreasureResult},
    render::compose::{ComposeOpts, Compositor},
    select::{ItemRequest, Selection, pick_random, resolve_items},
};

/// Per-draw options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawOpts {
    /// Badge the front card with its number and face.
    pub label: bool,
}

impl DrawOpts {
    fn compose_opts(self, selection: &Selection) -> ComposeOpts {
        if self.label {
            ComposeOpts::labeled(selection)
        } else {
            ComposeOpts::default()
        }
    }
}

/// One finished treasure: the cards it used and the full-resolution canvas.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// Cards used.
    pub selection: Selection,
    /// Full-resolution output.
    pub canvas: RgbaImage,
}

/// Folder, card snapshot and last render of one front end.
#[derive(Debug)]
pub struct TreasureSession {
    folder: PathBuf,
    deck: Deck,
    index: CardIndex,
    compositor: Compositor,
    last: Option<Rendered>,
}

impl TreasureSession {
    /// Scan `folder` and start a session on it, drawable or not.
    pub fn open(folder: impl Into<PathBuf>) -> Self {
        Self::with_compositor(folder, Compositor::default())
    }

    /// Like [`TreasureSession::open`] with a custom compositor.
    pub fn with_compositor(folder: impl Into<PathBuf>, compositor: Compositor) -> Self {
        let folder = folder.into();
        let scan = scan_folder(&folder);
        Self {
            deck: scan.deck(),
            index: scan.index(),
            folder,
            compositor,
            last: None,
        }
    }

    /// Folder the snapshot came from.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Cards available for random draws.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards available by number.
    pub fn index(&self) -> &CardIndex {
        &self.index
    }

    /// Deck counts.
    pub fn summary(&self) -> DeckSummary {
        self.deck.summary()
    }

    /// Most recent successful draw.
    pub fn last(&self) -> Option<&Rendered> {
        self.last.as_ref()
    }

    /// Switch to `folder` if it holds enough cards for a draw.
    ///
    /// On failure the session keeps its previous folder, snapshot and render.
    #[tracing::instrument(skip(self, folder), fields(folder = %folder.as_ref().display()))]
    pub fn change_folder(&mut self, folder: impl AsRef<Path>) -> TreasureResult<DeckSummary> {
        let folder = folder.as_ref();
        let scan = scan_folder(folder);
        let deck = scan.deck();
        if !deck.is_drawable() {
            tracing::warn!(
                fronts = deck.fronts.len(),
                backs = deck.backs.len(),
                "folder rejected"
            );
            return Err(TreasureError::InsufficientCards {
                backs: deck.backs.len(),
                fronts: deck.fronts.len(),
            });
        }
        self.folder = folder.to_path_buf();
        self.index = scan.index();
        self.deck = deck;
        tracing::info!(
            fronts = self.deck.fronts.len(),
            backs = self.deck.backs.len(),
            "folder adopted"
        );
        Ok(self.deck.summary())
    }

    /// Re-read the current folder, replacing the snapshot even if it became
    /// undrawable.
    pub fn rescan(&mut self) -> DeckSummary {
        let scan = scan_folder(&self.folder);
        self.deck = scan.deck();
        self.index = scan.index();
        self.deck.summary()
    }

    /// Random draw from the current deck.
    pub fn draw_random<R: Rng>(
        &mut self,
        rng: &mut R,
        opts: DrawOpts,
    ) -> TreasureResult<&Rendered> {
        let selection = pick_random(&self.deck, rng)?;
        self.finish(selection, opts)
    }

    /// Draw the five requested items from the current index.
    pub fn draw_items(
        &mut self,
        request: ItemRequest,
        opts: DrawOpts,
    ) -> TreasureResult<&Rendered> {
        let selection = resolve_items(&self.index, request)?;
        self.finish(selection, opts)
    }

    fn finish(&mut self, selection: Selection, opts: DrawOpts) -> TreasureResult<&Rendered> {
        let canvas = self
            .compositor
            .compose(&selection, &opts.compose_opts(&selection))?;
        Ok(&*self.last.insert(Rendered { selection, canvas }))
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
