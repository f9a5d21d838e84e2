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

// Not every test binary touches every helper.
#![allow(dead_code)]

use posgeo::forms::{Canonical2Form, canonical_form_from_triangulation};
use posgeo::geometry::Region2;
use posgeo::geometry::fixtures::NamedFixture2;
use posgeo::symbolic::{RatFn, Symbol};
use rug::Rational;

pub fn equal_up_to_sign(a: &RatFn, b: &RatFn) -> bool {
    a.sub(b).is_zero() || a.add(b).is_zero()
}

/// Builds the fixture's region and the canonical form from triangulation A
/// under full validation.
pub fn region_and_form(fixture: &NamedFixture2) -> (Region2, Canonical2Form) {
    let region = fixture.build_region();
    let tri = fixture
        .triangulation_a(&region.x, &region.y)
        .expect("fixture triangulation is non-degenerate");
    let form = canonical_form_from_triangulation(&tri, Some(&region), Some(&fixture.vertices))
        .expect("fixture triangulation is valid");
    (region, form)
}

/// `lim_{t -> at} sign * (t - at) * g`, which must be a finite rational.
pub fn endpoint_residue(g: &RatFn, t: &Symbol, at: &Rational, sign: i64) -> Rational {
    let mut value = g
        .limit_shifted_times_power(t, at, 1)
        .finite()
        .expect("endpoint residue must be finite")
        .as_constant()
        .expect("endpoint residue must be a constant");
    value *= Rational::from(sign);
    value
}
