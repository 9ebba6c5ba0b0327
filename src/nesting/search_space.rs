use std::collections::BTreeSet;

use crate::geometry::primitives::IVec;

/// The set of integer-lattice positions still available for the next
/// placement, maintained incrementally as placements accumulate.
///
/// Both sets iterate in lexicographic `(x, y)` order; the criterion's
/// tie-breaking depends on it.
#[derive(Debug, Clone, Default)]
pub struct SearchSpace {
    fit_total: BTreeSet<IVec>,
    no_fit_total: BTreeSet<IVec>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflects the addition of a placement at `position`:
    /// the placement's fit points are translated, filtered, and inserted
    /// unless already known to be blocked; its no-fit points are translated,
    /// evicted from the fit total and recorded as blocked for good.
    pub fn add_placement<'a>(
        &mut self,
        position: IVec,
        fit: impl IntoIterator<Item = &'a IVec>,
        no_fit: impl IntoIterator<Item = &'a IVec>,
        filter: impl Fn(IVec) -> bool,
    ) {
        for &p in fit {
            let translated = p + position;
            if filter(translated) && !self.no_fit_total.contains(&translated) {
                self.fit_total.insert(translated);
            }
        }
        for &p in no_fit {
            let translated = p + position;
            self.fit_total.remove(&translated);
            self.no_fit_total.insert(translated);
        }
    }

    pub fn fit_total(&self) -> &BTreeSet<IVec> {
        &self.fit_total
    }

    pub fn no_fit_total(&self) -> &BTreeSet<IVec> {
        &self.no_fit_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_stay_disjoint() {
        let mut space = SearchSpace::new();
        let fit = vec![IVec(10, 0), IVec(20, 0), IVec(0, 10)];
        let no_fit = vec![IVec(0, 0), IVec(10, 0)];
        space.add_placement(IVec::ORIGIN, &fit, &no_fit, |_| true);
        assert!(space.fit_total().is_disjoint(space.no_fit_total()));
        // (10, 0) was first inserted as fit, then evicted as no-fit
        assert!(!space.fit_total().contains(&IVec(10, 0)));
        assert!(space.no_fit_total().contains(&IVec(10, 0)));
    }

    #[test]
    fn blocked_points_never_come_back() {
        let mut space = SearchSpace::new();
        space.add_placement(IVec::ORIGIN, &[], &[IVec(10, 10)], |_| true);
        space.add_placement(IVec::ORIGIN, &[IVec(10, 10)], &[], |_| true);
        assert!(!space.fit_total().contains(&IVec(10, 10)));
    }

    #[test]
    fn filter_rejects_positions() {
        let mut space = SearchSpace::new();
        let fit = vec![IVec(10, 0), IVec(-10, 0)];
        space.add_placement(IVec::ORIGIN, &fit, &[], |v| v.0 > 0);
        assert!(space.fit_total().contains(&IVec(10, 0)));
        assert!(!space.fit_total().contains(&IVec(-10, 0)));
    }

    #[test]
    fn placement_position_translates_the_points() {
        let mut space = SearchSpace::new();
        space.add_placement(IVec(100, 50), &[IVec(10, 0)], &[IVec(0, 0)], |_| true);
        assert!(space.fit_total().contains(&IVec(110, 50)));
        assert!(space.no_fit_total().contains(&IVec(100, 50)));
    }
}
