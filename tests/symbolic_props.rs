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

use posgeo::symbolic::{LinExpr, Poly, Symbol};
use posgeo::symbolic::ratfn::{PoleLimit, RatFn};
use proptest::prelude::*;
use rug::Rational;

type Terms = Vec<(u32, u32, i32)>;

fn term_strategy() -> impl Strategy<Value = Terms> {
    proptest::collection::vec((0u32..3, 0u32..3, -5i32..6), 0..6)
}

fn poly_from_terms(x: &Symbol, y: &Symbol, terms: &Terms) -> Poly {
    let mut p = Poly::zero();
    for &(i, j, c) in terms {
        let mono = Poly::from_symbol(x)
            .pow(i)
            .mul(&Poly::from_symbol(y).pow(j))
            .scale(&Rational::from(c));
        p = p.add(&mono);
    }
    p
}

proptest! {
    #[test]
    fn poly_addition_commutes(ta in term_strategy(), tb in term_strategy()) {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let a = poly_from_terms(&x, &y, &ta);
        let b = poly_from_terms(&x, &y, &tb);
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn poly_multiplication_distributes(
        ta in term_strategy(),
        tb in term_strategy(),
        tc in term_strategy(),
    ) {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let a = poly_from_terms(&x, &y, &ta);
        let b = poly_from_terms(&x, &y, &tb);
        let c = poly_from_terms(&x, &y, &tc);
        prop_assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
    }

    #[test]
    fn linear_division_inverts_multiplication(
        a in -5i32..6,
        b in -5i32..6,
        c in -5i32..6,
        terms in term_strategy(),
    ) {
        prop_assume!(a != 0 || b != 0);
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let lin = LinExpr::new(
            vec![(x.clone(), Rational::from(a)), (y.clone(), Rational::from(b))],
            Rational::from(c),
        )
        .to_poly();
        let p = poly_from_terms(&x, &y, &terms);
        prop_assert_eq!(lin.mul(&p).div_exact_linear(&lin), Some(p));
    }

    #[test]
    fn evaluation_is_a_ring_homomorphism(
        ta in term_strategy(),
        tb in term_strategy(),
        xn in -7i64..8,
        yn in -7i64..8,
    ) {
        let x = Symbol::new("x");
        let y = Symbol::new("y");
        let a = poly_from_terms(&x, &y, &ta);
        let b = poly_from_terms(&x, &y, &tb);
        let at = [
            (x.clone(), Rational::from((xn, 3))),
            (y.clone(), Rational::from((yn, 5))),
        ];
        let mut sum = a.eval(&at);
        sum += b.eval(&at);
        prop_assert_eq!(a.add(&b).eval(&at), sum);
        let mut prod = a.eval(&at);
        prod *= b.eval(&at);
        prop_assert_eq!(a.mul(&b).eval(&at), prod);
    }

    #[test]
    fn simple_pole_limit_is_numerator_over_residual_denominator(
        terms in term_strategy(),
        qb in -5i32..6,
        qc in -5i32..6,
    ) {
        prop_assume!(qb != 0 || qc != 0);
        let u = Symbol::new("u");
        let t = Symbol::new("t");
        // Reuse the two-variable generator as a polynomial in (u, t).
        let p = poly_from_terms(&u, &t, &terms);
        prop_assume!(!p.is_zero());
        let q = LinExpr::new(vec![(t.clone(), Rational::from(qb))], Rational::from(qc));

        let f = RatFn::new(
            p.clone(),
            vec![(LinExpr::from_symbol(&u), 1), (q.clone(), 1)],
        );
        // lim u->0 of u * p/(u*q) is p(0, t)/q(t), exactly.
        let expected = RatFn::new(p.coeff_for_power(&u, 0), vec![(q, 1)]);
        match f.limit_times_power(&u, 1) {
            PoleLimit::Finite(g) => prop_assert_eq!(g, expected),
            PoleLimit::Unbounded => prop_assert!(false, "simple pole reported as unbounded"),
        }
    }
}
