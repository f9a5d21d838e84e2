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

use rug::Rational;

use crate::geometry::point_2::Point2;
use crate::symbolic::linear::LinExpr;
use crate::symbolic::symbol::Symbol;

/// A linear function `L(x, y)` with the convention that `L > 0` is the
/// "inside" half-plane (exactly 0 on the line itself). Built once per facet
/// or triangle edge and immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrientedLine2 {
    pub x: Symbol,
    pub y: Symbol,
    pub expr: LinExpr,
}

impl OrientedLine2 {
    pub fn new(x: &Symbol, y: &Symbol, expr: LinExpr) -> Self {
        OrientedLine2 {
            x: x.clone(),
            y: y.clone(),
            expr,
        }
    }

    pub fn grad(&self) -> (Rational, Rational) {
        (self.expr.coeff(&self.x), self.expr.coeff(&self.y))
    }

    pub fn eval_at(&self, p: &Point2) -> Rational {
        self.expr.eval(&[
            (self.x.clone(), p.x.clone()),
            (self.y.clone(), p.y.clone()),
        ])
    }

    /// Canonical representative for comparisons; orientation is not
    /// preserved, so this is for display and dedup only.
    pub fn normalized_expr(&self) -> LinExpr {
        self.expr.normalized().0
    }
}

/// Line through `p` and `q` from the determinant construction
///
/// ```text
/// | x  y  1 |
/// | px py 1 |
/// | qx qy 1 |
/// ```
///
/// which vanishes exactly on the line joining the two points.
pub fn line_through(x: &Symbol, y: &Symbol, p: &Point2, q: &Point2) -> LinExpr {
    let mut a = p.y.clone();
    a -= &q.y;
    let mut b = q.x.clone();
    b -= &p.x;
    let mut c = p.x.clone();
    c *= &q.y;
    let mut back = q.x.clone();
    back *= &p.y;
    c -= &back;
    LinExpr::new(vec![(x.clone(), a), (y.clone(), b)], c)
}

/// Flips `expr` if needed so it is strictly positive at `interior`.
/// `None` when the point lies on the line, in which case no orientation
/// exists.
pub fn orient_positive_at(expr: LinExpr, x: &Symbol, y: &Symbol, interior: &Point2) -> Option<LinExpr> {
    let val = expr.eval(&[
        (x.clone(), interior.x.clone()),
        (y.clone(), interior.y.clone()),
    ]);
    match val.cmp0() {
        Ordering::Equal => None,
        Ordering::Less => Some(expr.neg()),
        Ordering::Greater => Some(expr),
    }
}
