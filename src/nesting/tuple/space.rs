use std::collections::BTreeSet;

use crate::geometry::primitives::IVec;

/// Paired ordered sets of fit and no-fit offsets, the unit of composition in
/// tuple nesting: compound spaces for pairs and quadruples are built from
/// single-orientation spaces with [Space::add_subtract] and [Space::reflect].
#[derive(Debug, Clone, Default)]
pub struct Space {
    fit: BTreeSet<IVec>,
    no_fit: BTreeSet<IVec>,
}

impl Space {
    pub fn from_points(fit: &[IVec], no_fit: &[IVec]) -> Space {
        Space {
            fit: fit.iter().copied().collect(),
            no_fit: no_fit.iter().copied().collect(),
        }
    }

    /// The compound space of an anchor space at the origin and a second space
    /// translated to `position`.
    pub fn compose(anchor: &Space, attached: &Space, position: IVec) -> Space {
        let mut space = anchor.clone();
        space.add_subtract(attached, position);
        space
    }

    /// Merges `other`, translated by `position`, into `self`: translated fit
    /// points enter unless already blocked; translated no-fit points evict
    /// fit points and are recorded as blocked.
    pub fn add_subtract(&mut self, other: &Space, position: IVec) {
        for &p in &other.fit {
            let translated = p + position;
            if !self.no_fit.contains(&translated) {
                self.fit.insert(translated);
            }
        }
        for &p in &other.no_fit {
            let translated = p + position;
            self.fit.remove(&translated);
            self.no_fit.insert(translated);
        }
    }

    /// The space reflected about the origin: the space of the swapped
    /// anchor/probe roles.
    pub fn reflect(&self) -> Space {
        Space {
            fit: self.fit.iter().map(|v| v.reflect()).collect(),
            no_fit: self.no_fit.iter().map(|v| v.reflect()).collect(),
        }
    }

    pub fn fit_points(&self) -> &BTreeSet<IVec> {
        &self.fit
    }

    pub fn no_fit_points(&self) -> &BTreeSet<IVec> {
        &self.no_fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_subtract_keeps_the_sets_disjoint() {
        let mut a = Space::from_points(&[IVec(10, 0)], &[IVec(0, 0)]);
        let b = Space::from_points(&[IVec(-10, 0), IVec(0, 0)], &[IVec(10, 0)]);
        a.add_subtract(&b, IVec::ORIGIN);
        assert!(a.fit_points().is_disjoint(a.no_fit_points()));
        // b's no-fit point evicted a's fit point
        assert!(!a.fit_points().contains(&IVec(10, 0)));
        // b's fit point at a blocked position never entered
        assert!(!a.fit_points().contains(&IVec(0, 0)));
        assert!(a.fit_points().contains(&IVec(-10, 0)));
    }

    #[test]
    fn compose_translates_the_attached_space() {
        let anchor = Space::from_points(&[IVec(10, 0)], &[IVec(0, 0)]);
        let attached = Space::from_points(&[IVec(10, 0)], &[IVec(0, 0)]);
        let compound = Space::compose(&anchor, &attached, IVec(50, 0));
        assert!(compound.fit_points().contains(&IVec(60, 0)));
        assert!(compound.no_fit_points().contains(&IVec(50, 0)));
        assert!(compound.no_fit_points().contains(&IVec(0, 0)));
    }

    #[test]
    fn reflect_is_an_involution() {
        let space = Space::from_points(&[IVec(10, 20), IVec(-5, 3)], &[IVec(1, -1)]);
        let back = space.reflect().reflect();
        assert_eq!(space.fit_points(), back.fit_points());
        assert_eq!(space.no_fit_points(), back.no_fit_points());
    }
}
