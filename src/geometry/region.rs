// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use ahash::AHashSet;
use rug::Rational;

use crate::geometry::lines::OrientedLine2;
use crate::geometry::point_2::Point2;
use crate::symbolic::symbol::Symbol;

/// Region defined by linear inequalities `L_i(x, y) >= 0`, strictly positive
/// in the open interior. Built once from fixture data and read-only for the
/// rest of the pipeline.
#[derive(Clone, Debug)]
pub struct Region2 {
    pub x: Symbol,
    pub y: Symbol,
    pub facets: BTreeMap<String, OrientedLine2>,
}

/// The lattice scan ran dry before producing the requested sample size.
#[derive(Debug)]
pub struct InteriorSamplingError {
    pub requested: usize,
    pub found: usize,
}

impl fmt::Display for InteriorSamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to deterministically produce {} interior rational points; got {}",
            self.requested, self.found
        )
    }
}

impl Error for InteriorSamplingError {}

impl Region2 {
    pub fn new(x: Symbol, y: Symbol, facets: BTreeMap<String, OrientedLine2>) -> Self {
        Region2 { x, y, facets }
    }

    /// Exact strict interior test.
    pub fn contains(&self, p: &Point2) -> bool {
        self.facets
            .values()
            .all(|line| line.eval_at(p).cmp0() == Ordering::Greater)
    }

    /// Deterministic exact interior points from an ordered rational lattice
    /// scan of the open unit square: denominators 2..=`max_denominator`,
    /// numerators in scan order, duplicates skipped. Reproducible
    /// substitution points for confluence smoke checks.
    pub fn interior_lattice_points(
        &self,
        n: usize,
        max_denominator: u32,
    ) -> Result<Vec<Point2>, InteriorSamplingError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut points = Vec::with_capacity(n);
        let mut seen: AHashSet<Point2> = AHashSet::new();
        for denom in 2..=max_denominator {
            for ix in 1..denom {
                let xv = Rational::from((ix, denom));
                for iy in 1..denom {
                    let yv = Rational::from((iy, denom));
                    let p = Point2 {
                        x: xv.clone(),
                        y: yv,
                    };
                    if seen.contains(&p) {
                        continue;
                    }
                    if self.contains(&p) {
                        seen.insert(p.clone());
                        points.push(p);
                        if points.len() == n {
                            return Ok(points);
                        }
                    }
                }
            }
        }
        Err(InteriorSamplingError {
            requested: n,
            found: points.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{rat, rat_int};
    use crate::symbolic::linear::LinExpr;

    fn unit_square() -> Region2 {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let mut facets = BTreeMap::new();
        facets.insert(
            "left".to_string(),
            OrientedLine2::new(&x, &y, LinExpr::from_symbol(&x)),
        );
        facets.insert(
            "bottom".to_string(),
            OrientedLine2::new(&x, &y, LinExpr::from_symbol(&y)),
        );
        facets.insert(
            "right".to_string(),
            OrientedLine2::new(&x, &y, LinExpr::affine(&x, rat_int(-1), rat_int(1))),
        );
        facets.insert(
            "top".to_string(),
            OrientedLine2::new(&x, &y, LinExpr::affine(&y, rat_int(-1), rat_int(1))),
        );
        Region2::new(x, y, facets)
    }

    #[test]
    fn contains_is_strict() {
        let region = unit_square();
        assert!(region.contains(&Point2::new(rat(1, 2), rat(1, 2))));
        assert!(!region.contains(&Point2::new(0, rat(1, 2))));
        assert!(!region.contains(&Point2::new(2, rat(1, 2))));
    }

    #[test]
    fn lattice_scan_is_deterministic_and_interior() {
        let region = unit_square();
        let a = region.interior_lattice_points(15, 20).unwrap();
        let b = region.interior_lattice_points(15, 20).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 15);
        for p in &a {
            assert!(region.contains(p));
        }
        // First hit of the scan is the square's center.
        assert_eq!(a[0], Point2::new(rat(1, 2), rat(1, 2)));
    }
}
