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

use rug::Rational;

use crate::geometry::point_2::Point2;

/// Twice the signed area of triangle `abc`.
///
/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Rational {
    let mut lhs = b.x.clone();
    lhs -= &a.x;
    let mut dy = c.y.clone();
    dy -= &a.y;
    lhs *= &dy;

    let mut rhs = b.y.clone();
    rhs -= &a.y;
    let mut dx = c.x.clone();
    dx -= &a.x;
    rhs *= &dx;

    lhs -= &rhs;
    lhs
}

/// Twice the signed shoelace area of a closed vertex cycle.
pub fn polygon_double_area(vertices: &[Point2]) -> Rational {
    let mut acc = Rational::new();
    let n = vertices.len();
    for i in 0..n {
        let p = &vertices[i];
        let q = &vertices[(i + 1) % n];
        let mut term = p.x.clone();
        term *= &q.y;
        let mut back = p.y.clone();
        back *= &q.x;
        term -= &back;
        acc += &term;
    }
    acc
}
