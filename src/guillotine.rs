use serde::Serialize;
use tracing::trace;

use crate::types::{Item, Placement, Rect};

/// A maximal empty axis-aligned region of a bin, anchored at its
/// bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeRect {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

impl FreeRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            rect: Rect::new(w, h),
        }
    }
}

/// Footprint of an item after insertion, in the orientation it was placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedItem {
    pub item: u32,
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub id: u32,
    pub size: Rect,
    pub cost: u32,
    pub free_rects: Vec<FreeRect>,
    pub placed: Vec<PlacedItem>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub rotated: bool,
    /// Best Short Side Fit: (leftover short side, leftover long side),
    /// compared lexicographically, lower is better.
    pub score: (u32, u32),
}

fn bssf_score(piece: Rect, free: Rect) -> (u32, u32) {
    let leftover_w = free.w - piece.w;
    let leftover_h = free.h - piece.h;
    (
        std::cmp::min(leftover_w, leftover_h),
        std::cmp::max(leftover_w, leftover_h),
    )
}

/// Splits a free rectangle around a piece placed flush with its bottom-left
/// corner, with a single guillotine cut spanning the whole rectangle.
///
/// The cut axis follows the rectangle's own aspect ratio: when the rectangle
/// is at least as tall as it is wide, the cut is horizontal and the top piece
/// spans the full width; otherwise the cut is vertical and the right piece
/// spans the full height. Degenerate pieces (zero extent) are dropped, so the
/// result together with the piece tiles the original rectangle exactly.
pub fn split_guillotine(free: FreeRect, piece: Rect) -> Vec<FreeRect> {
    let horizontal = free.rect.w <= free.rect.h;
    let right_w = free.rect.w - piece.w;
    let right_h = if horizontal { piece.h } else { free.rect.h };
    let top_w = if horizontal { free.rect.w } else { piece.w };
    let top_h = free.rect.h - piece.h;

    let mut pieces = Vec::with_capacity(2);
    if right_w > 0 && right_h > 0 {
        pieces.push(FreeRect::new(free.x + piece.w, free.y, right_w, right_h));
    }
    if top_w > 0 && top_h > 0 {
        pieces.push(FreeRect::new(free.x, free.y + piece.h, top_w, top_h));
    }
    pieces
}

/// Coalesces `b` into `a` when `b` sits flush above or flush to the right of
/// `a` with a matching edge. Only that direction is checked; the symmetric
/// case is found when the merge scan reaches `b` as the first element.
fn merged_with(a: FreeRect, b: FreeRect) -> Option<FreeRect> {
    if a.rect.w == b.rect.w && a.x == b.x && b.y == a.y + a.rect.h {
        return Some(FreeRect::new(a.x, a.y, a.rect.w, a.rect.h + b.rect.h));
    }
    if a.rect.h == b.rect.h && a.y == b.y && b.x == a.x + a.rect.w {
        return Some(FreeRect::new(a.x, a.y, a.rect.w + b.rect.w, a.rect.h));
    }
    None
}

impl Bin {
    /// A fresh bin is one free rectangle covering its whole area.
    pub fn new(id: u32, size: Rect, cost: u32) -> Self {
        Self {
            id,
            size,
            cost,
            free_rects: vec![FreeRect::new(0, 0, size.w, size.h)],
            placed: Vec::new(),
        }
    }

    pub fn used_area(&self) -> u64 {
        self.placed.iter().map(|p| p.rect.area()).sum()
    }

    pub fn free_area(&self) -> u64 {
        self.free_rects.iter().map(|f| f.rect.area()).sum()
    }

    /// Best Short Side Fit over every (free rectangle, orientation) pair.
    /// Only a strictly better score displaces the incumbent, so the first
    /// candidate found wins ties and the scan order is deterministic.
    pub fn find_best(&self, piece: Rect) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            for rotated in [false, true] {
                let oriented = if rotated { piece.rotated() } else { piece };
                if !oriented.fits_in(&free.rect) {
                    continue;
                }
                let score = bssf_score(oriented, free.rect);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        rotated,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Attempts to insert `item` into this bin. On success the item is marked
    /// placed, the consumed free rectangle is replaced by its guillotine
    /// split, and adjacent free rectangles are merged; on failure neither the
    /// bin nor the item is touched.
    pub fn try_insert(&mut self, item: &mut Item) -> bool {
        let Some(scored) = self.find_best(item.size) else {
            return false;
        };

        let free = self.free_rects.remove(scored.free_idx);
        let oriented = if scored.rotated {
            item.size.rotated()
        } else {
            item.size
        };

        item.placement = Placement::Placed {
            bin: self.id,
            x: free.x,
            y: free.y,
            // Report rotation relative to the raw input orientation.
            rotated: item.flipped ^ scored.rotated,
        };
        self.placed.push(PlacedItem {
            item: item.id,
            x: free.x,
            y: free.y,
            rect: oriented,
        });
        trace!(
            item = item.id,
            bin = self.id,
            x = free.x,
            y = free.y,
            rotated = scored.rotated,
            "placed"
        );

        self.free_rects.extend(split_guillotine(free, oriented));
        self.merge_free_rects();
        true
    }

    /// One pass over the free-rectangle list, coalescing edge-sharing pairs.
    ///
    /// Merged rectangles are appended at the end; because the pass runs to
    /// the list's current length they are revisited, but the pass is not
    /// restarted, so some merges enabled purely by earlier merges in the
    /// same pass can be left behind. That residual fragmentation is accepted.
    fn merge_free_rects(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let a = self.free_rects[i];
            let partner = self
                .free_rects
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .find_map(|(j, &b)| merged_with(a, b).map(|m| (j, m)));

            let Some((j, merged)) = partner else {
                i += 1;
                continue;
            };

            // Remove the higher index first so the lower one stays valid.
            self.free_rects.remove(i.max(j));
            self.free_rects.remove(i.min(j));
            self.free_rects.push(merged);
            // Two removals before position i shift the next unseen element
            // back by one; stay on it instead of skipping.
            if j < i {
                i -= 1;
            }
        }
    }
}
