use serde::{Deserialize, Serialize};

use crate::guillotine::Bin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Where an item ended up. `Unplaced` is a normal outcome, not an error:
/// the greedy pass never retries an item once every bin has refused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Unplaced,
    Placed {
        bin: u32,
        x: u32,
        y: u32,
        /// Swap relative to the *input* orientation, canonicalization included.
        rotated: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    /// Canonical dimensions: the longer input side is stored as `w`.
    pub size: Rect,
    /// True when canonicalization swapped the raw input sides.
    pub flipped: bool,
    pub placement: Placement,
}

impl Item {
    /// Builds an item from raw input dimensions, canonicalizing so that
    /// `size.w >= size.h`.
    pub fn new(id: u32, w: u32, h: u32) -> Self {
        let flipped = h > w;
        let size = if flipped {
            Rect::new(h, w)
        } else {
            Rect::new(w, h)
        };
        Self {
            id,
            size,
            flipped,
            placement: Placement::Unplaced,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.placement, Placement::Placed { .. })
    }

    /// One output record: `<id> <bin|-1> <x> <y> <rotated:0|1>`.
    /// Unplaced items get the `-1` sentinel and zeroed fields.
    pub fn report_line(&self) -> String {
        match self.placement {
            Placement::Placed { bin, x, y, rotated } => {
                format!("{} {} {} {} {}", self.id, bin, x, y, rotated as u8)
            }
            Placement::Unplaced => format!("{} -1 0 0 0", self.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub items: Vec<Item>,
    pub bins: Vec<Bin>,
}

impl Solution {
    pub fn placed_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_placed()).count()
    }

    pub fn bins_used(&self) -> usize {
        self.bins.iter().filter(|b| !b.placed.is_empty()).count()
    }

    /// Sum of acquisition costs over bins that received at least one item.
    pub fn total_cost(&self) -> u64 {
        self.bins
            .iter()
            .filter(|b| !b.placed.is_empty())
            .map(|b| b.cost as u64)
            .sum()
    }

    /// Waste across used bins: the unoccupied fraction of their combined area.
    pub fn waste_percent(&self) -> f64 {
        let total_area: u64 = self
            .bins
            .iter()
            .filter(|b| !b.placed.is_empty())
            .map(|b| b.size.area())
            .sum();
        if total_area == 0 {
            return 0.0;
        }
        let occupied: u64 = self
            .bins
            .iter()
            .filter(|b| !b.placed.is_empty())
            .map(|b| b.used_area())
            .sum();
        (total_area - occupied) as f64 / total_area as f64 * 100.0
    }

    /// Per-item assignment lines in ascending item id order.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            out.push_str(&item.report_line());
            out.push('\n');
        }
        out
    }
}
