use std::cmp::Ordering;

use tracing::{debug, info};

use crate::guillotine::Bin;
use crate::types::{Item, Solution};

/// Packing order for items: descending canonical width (the longer side),
/// then descending height. Larger items go first so they are not left for
/// already-fragmented bins. Ties keep their input-relative order (the sort
/// is stable).
pub fn item_packing_order(a: &Item, b: &Item) -> Ordering {
    b.size
        .w
        .cmp(&a.size.w)
        .then_with(|| b.size.h.cmp(&a.size.h))
}

/// Processing order for bins: descending area-per-cost, tie-broken by the
/// compactness ratio area/(width+height). Both ratios are compared by
/// cross-multiplication so the order never depends on float rounding.
pub fn bin_efficiency_order(a: &Bin, b: &Bin) -> Ordering {
    let lhs = a.size.area() as u128 * b.cost as u128;
    let rhs = b.size.area() as u128 * a.cost as u128;
    rhs.cmp(&lhs).then_with(|| {
        let lhs = a.size.area() as u128 * (b.size.w as u128 + b.size.h as u128);
        let rhs = b.size.area() as u128 * (a.size.w as u128 + a.size.h as u128);
        rhs.cmp(&lhs)
    })
}

/// Greedy first-fit driver over a single problem instance. Owns every item
/// and bin for the duration of one run; nothing persists across runs.
pub struct Solver {
    items: Vec<Item>,
    bins: Vec<Bin>,
}

impl Solver {
    pub fn new(items: Vec<Item>, bins: Vec<Bin>) -> Self {
        Self { items, bins }
    }

    /// Packs every item into the first bin (in efficiency order) that
    /// accepts it. A placement is final: there is no backtracking and no
    /// second attempt for refused items.
    pub fn solve(mut self) -> Solution {
        self.items.sort_by(item_packing_order);
        self.bins.sort_by(bin_efficiency_order);

        for item in &mut self.items {
            let accepted = self.bins.iter_mut().any(|bin| bin.try_insert(item));
            if !accepted {
                debug!(item = item.id, "no bin accepts item, leaving unplaced");
            }
        }

        // Back to input id order for reporting.
        self.items.sort_by_key(|i| i.id);
        self.bins.sort_by_key(|b| b.id);

        let solution = Solution {
            items: self.items,
            bins: self.bins,
        };
        info!(
            placed = solution.placed_count(),
            unplaced = solution.items.len() - solution.placed_count(),
            bins_used = solution.bins_used(),
            total_cost = solution.total_cost(),
            "packing finished"
        );
        solution
    }
}
