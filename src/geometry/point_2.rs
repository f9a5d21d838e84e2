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

use std::fmt;

use rug::Rational;

/// Exact point in the ambient plane.
///
/// Derived lexicographic ordering gives every undirected edge a canonical
/// endpoint order, and hashing lets points key adjacency maps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point2 {
    pub x: Rational,
    pub y: Rational,
}

impl Point2 {
    pub fn new<X, Y>(x: X, y: Y) -> Self
    where
        X: Into<Rational>,
        Y: Into<Rational>,
    {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn midpoint(&self, other: &Point2) -> Point2 {
        let mut x = self.x.clone();
        x += &other.x;
        x /= 2u32;
        let mut y = self.y.clone();
        y += &other.y;
        y /= 2u32;
        Point2 { x, y }
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::rat;

    #[test]
    fn midpoint_is_exact() {
        let a = Point2::new(0, 1);
        let b = Point2::new(rat(1, 2), 0);
        assert_eq!(a.midpoint(&b), Point2::new(rat(1, 4), rat(1, 2)));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Point2::new(0, 5) < Point2::new(1, 0));
        assert!(Point2::new(1, 0) < Point2::new(1, 1));
    }
}
