//! Angle allocation for a parent's children.
//!
//! Children are split into two groups before allocation:
//! - cross-cluster children fan out inside a narrow arc around the parent's
//!   own incoming direction, so the link reads as "going somewhere else";
//! - same-cluster children use a full turn, rotated past the slots the
//!   cross-cluster group already took.
//!
//! A same-cluster angle never lands on a cross-cluster one. If the rotated
//! full turn comes too close to the fan, it is turned further, into the
//! middle of the widest gap the fan leaves.
//!
//! The root has no incoming direction, so all of its children share one
//! evenly spaced full circle starting at `root_start_angle`.

use std::f64::consts::TAU;

use super::LayoutConfig;

/// Which of a parent's child groups is being allocated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ChildGroup {
    CrossCluster,
    /// `cross` is the fan already placed around the same parent, if any.
    SameCluster { cross: Option<PlacedFan> },
}

/// `angle(i) = start + i * step`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AngleAllocation {
    pub start: f64,
    pub step: f64,
}

impl AngleAllocation {
    pub fn angle(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }
}

/// An allocation together with how many children it placed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedFan {
    pub alloc: AngleAllocation,
    pub count: usize,
}

impl PlacedFan {
    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|i| self.alloc.angle(i))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnglePolicy {
    pub root_start_angle: f64,
    pub cross_cluster_span: f64,
    pub same_cluster_start_offset: f64,
    pub jitter: f64,
    pub jitter_odd_counts: bool,
}

impl AnglePolicy {
    pub fn from_config(cfg: &LayoutConfig) -> Self {
        Self {
            root_start_angle: cfg.root_start_angle,
            cross_cluster_span: cfg.cross_cluster_span,
            same_cluster_start_offset: cfg.same_cluster_start_offset,
            jitter: cfg.non_straight_branch_factor,
            jitter_odd_counts: cfg.jitter_odd_counts,
        }
    }

    /// Start angle and step for `count` children around `anchor`.
    ///
    /// Returns None when there is nothing to place. For the root, `anchor`
    /// and `group` are ignored and `count` is the root's total child count.
    pub fn allocate(
        &self,
        count: usize,
        anchor: f64,
        is_root: bool,
        group: ChildGroup,
    ) -> Option<AngleAllocation> {
        if count == 0 {
            return None;
        }
        let n = count as f64;

        if is_root {
            return Some(AngleAllocation { start: self.root_start_angle, step: TAU / n });
        }

        match group {
            ChildGroup::CrossCluster => {
                let step = self.cross_cluster_span / n;
                let half = (count / 2) as f64;
                // Never spawn perfectly straight out from the parent.
                let jitter = match (count % 2 == 0, self.jitter_odd_counts) {
                    (true, _) => self.jitter,
                    (false, true) => -self.jitter,
                    (false, false) => 0.0,
                };
                Some(AngleAllocation { start: anchor - step * half + jitter, step })
            }
            ChildGroup::SameCluster { cross } => {
                let step = TAU / n;
                let after = cross.map_or(0, |f| f.count) as f64;
                let start = anchor + after * step / 2.0 + self.same_cluster_start_offset;
                let start = match cross {
                    Some(fan) if fan.count > 0 => clear_of(start, step, &fan),
                    _ => start,
                };
                Some(AngleAllocation { start, step })
            }
        }
    }
}

/// Smallest angular distance between `fan` and the full turn `start + k * step`.
///
/// The full turn repeats every `step`, so distances are taken modulo `step`.
pub(crate) fn clearance(start: f64, step: f64, fan: &PlacedFan) -> f64 {
    fan.angles()
        .map(|c| {
            let d = (c - start).rem_euclid(step);
            d.min(step - d)
        })
        .fold(f64::INFINITY, f64::min)
}

/// Keep `start` if the turn already clears `fan`, otherwise rotate it into
/// the middle of the widest gap between the fan's angles (modulo `step`).
///
/// The widest of `fan.count` gaps on a circle of length `step` is at least
/// `step / fan.count`, so the result clears every fan angle by at least
/// `step / (2 * fan.count)`.
fn clear_of(start: f64, step: f64, fan: &PlacedFan) -> f64 {
    let required = step / (2.0 * (fan.count + 1) as f64);
    if clearance(start, step, fan) >= required {
        return start;
    }

    let mut residues: Vec<f64> = fan.angles().map(|c| (c - start).rem_euclid(step)).collect();
    residues.sort_by(f64::total_cmp);

    // Start from the wrap-around gap, last residue back to the first.
    let last = residues[residues.len() - 1];
    let (mut best_at, mut best_gap) = (last, residues[0] + step - last);
    for pair in residues.windows(2) {
        let gap = pair[1] - pair[0];
        if gap > best_gap {
            best_at = pair[0];
            best_gap = gap;
        }
    }
    start + best_at + best_gap / 2.0
}
