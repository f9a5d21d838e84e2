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
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use rug::Rational;

use crate::numeric::pow_rat;
use crate::symbolic::linear::LinExpr;
use crate::symbolic::poly::Poly;
use crate::symbolic::symbol::Symbol;

/// Rational function whose denominator is a multiset of canonical linear
/// factors.
///
/// Every denominator in this crate arises as a product of lines, so the
/// factorization is carried by construction instead of being recovered
/// afterwards. Scalar content lives entirely in the numerator; the factor
/// map only ever holds normalized, non-constant `LinExpr`s. Values are kept
/// reduced (no factor divides the numerator), which makes the canonical
/// representation unique and derived equality an exact symbolic identity
/// test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatFn {
    num: Poly,
    den: BTreeMap<LinExpr, u32>,
}

/// Outcome of `lim_{v -> 0} v^k * f`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoleLimit {
    Finite(RatFn),
    Unbounded,
}

impl PoleLimit {
    pub fn finite(self) -> Option<RatFn> {
        match self {
            PoleLimit::Finite(f) => Some(f),
            PoleLimit::Unbounded => None,
        }
    }
}

impl RatFn {
    pub fn zero() -> Self {
        RatFn {
            num: Poly::zero(),
            den: BTreeMap::new(),
        }
    }

    pub fn one() -> Self {
        RatFn::from_poly(Poly::one())
    }

    pub fn constant(c: Rational) -> Self {
        RatFn::from_poly(Poly::constant(c))
    }

    pub fn from_poly(num: Poly) -> Self {
        RatFn {
            num,
            den: BTreeMap::new(),
        }
    }

    /// Builds `num / prod(factors)`, normalizing each factor and folding the
    /// normalization scales and any constant factors into the numerator.
    ///
    /// Panics if a factor is identically zero: a vanishing denominator is a
    /// construction bug, never data.
    pub fn new(num: Poly, factors: Vec<(LinExpr, u32)>) -> Self {
        let mut den: BTreeMap<LinExpr, u32> = BTreeMap::new();
        let mut content = Rational::from(1);
        for (f, m) in factors {
            assert!(!f.is_zero(), "denominator factor is identically zero");
            if m == 0 {
                continue;
            }
            let (canonical, scale) = f.normalized();
            content *= pow_rat(&scale, m);
            if canonical.is_constant() {
                continue;
            }
            *den.entry(canonical).or_insert(0) += m;
        }
        let num = num.scale(&content.recip());
        RatFn { num, den }.reduced()
    }

    pub fn num(&self) -> &Poly {
        &self.num
    }

    pub fn den_factors(&self) -> impl Iterator<Item = (&LinExpr, u32)> {
        self.den.iter().map(|(f, &m)| (f, m))
    }

    pub fn den_poly(&self) -> Poly {
        let mut p = Poly::one();
        for (f, m) in &self.den {
            p = Poly::mul(&p, &f.to_poly().pow(*m));
        }
        p
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn as_constant(&self) -> Option<Rational> {
        if self.den.is_empty() {
            self.num.as_constant()
        } else {
            None
        }
    }

    /// True when the normalized `locus` survives as a denominator factor.
    pub fn has_pole_factor(&self, locus: &LinExpr) -> bool {
        if locus.is_zero() {
            return false;
        }
        let (canonical, _) = locus.normalized();
        self.den.contains_key(&canonical)
    }

    /// Cancels denominator factors into the numerator until none divides it.
    fn reduced(mut self) -> RatFn {
        if self.num.is_zero() {
            self.den.clear();
            return self;
        }
        let factors: Vec<LinExpr> = self.den.keys().cloned().collect();
        for f in factors {
            let fp = f.to_poly();
            while self.den.get(&f).copied().unwrap_or(0) > 0 {
                match self.num.div_exact_linear(&fp) {
                    Some(q) => {
                        self.num = q;
                        let m = self.den.get_mut(&f).unwrap();
                        *m -= 1;
                        if *m == 0 {
                            self.den.remove(&f);
                        }
                    }
                    None => break,
                }
            }
        }
        self
    }

    pub fn add(&self, other: &RatFn) -> RatFn {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let mut union = self.den.clone();
        for (f, m) in &other.den {
            let entry = union.entry(f.clone()).or_insert(0);
            *entry = (*entry).max(*m);
        }
        let lift = |rf: &RatFn| -> Poly {
            let mut p = rf.num.clone();
            for (f, m) in &union {
                let have = rf.den.get(f).copied().unwrap_or(0);
                if *m > have {
                    p = Poly::mul(&p, &f.to_poly().pow(*m - have));
                }
            }
            p
        };
        let num = Poly::add(&lift(self), &lift(other));
        RatFn { num, den: union }.reduced()
    }

    pub fn sub(&self, other: &RatFn) -> RatFn {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> RatFn {
        RatFn {
            num: Poly::neg(&self.num),
            den: self.den.clone(),
        }
    }

    pub fn scale(&self, k: &Rational) -> RatFn {
        if k.cmp0() == Ordering::Equal {
            return RatFn::zero();
        }
        RatFn {
            num: self.num.scale(k),
            den: self.den.clone(),
        }
    }

    pub fn mul(&self, other: &RatFn) -> RatFn {
        if self.is_zero() || other.is_zero() {
            return RatFn::zero();
        }
        let mut den = self.den.clone();
        for (f, m) in &other.den {
            *den.entry(f.clone()).or_insert(0) += m;
        }
        RatFn {
            num: Poly::mul(&self.num, &other.num),
            den,
        }
        .reduced()
    }

    /// Exact evaluation; `None` on a denominator zero.
    pub fn eval(&self, bindings: &[(Symbol, Rational)]) -> Option<Rational> {
        let mut den_val = Rational::from(1);
        for (f, m) in &self.den {
            let v = f.eval(bindings);
            if v.cmp0() == Ordering::Equal {
                return None;
            }
            den_val *= pow_rat(&v, *m);
        }
        let mut out = self.num.eval(bindings);
        out /= den_val;
        Some(out)
    }

    /// Substitutes `var := repl` (affine). Denominator lines stay linear
    /// under affine composition; a factor collapsing to a nonzero constant
    /// is folded into the numerator, and collapsing to zero panics (the
    /// substitution was not a chart).
    pub fn subs_affine(&self, var: &Symbol, repl: &LinExpr) -> RatFn {
        let num = self.num.subs(var, &repl.to_poly());
        let factors: Vec<(LinExpr, u32)> = self
            .den
            .iter()
            .map(|(f, m)| (f.subs(var, repl), *m))
            .collect();
        RatFn::new(num, factors)
    }

    /// `lim_{v -> 0} v^k * f`, computed by counting orders of vanishing:
    /// with `num = v^p * N` and `q` copies of the factor `v` in the
    /// denominator, the limit is unbounded for `k + p - q < 0`, zero for
    /// `> 0`, and `N(0) / D(0)` for `= 0` where `D` is the product of the
    /// remaining factors. No general limit theory is needed.
    pub fn limit_times_power(&self, var: &Symbol, k: u32) -> PoleLimit {
        if self.num.is_zero() {
            return PoleLimit::Finite(RatFn::zero());
        }
        let v_factor = LinExpr::from_symbol(var);
        let q = self.den.get(&v_factor).copied().unwrap_or(0);
        let p = self.num.min_degree_in(var);
        let order = k as i64 + p as i64 - q as i64;
        if order < 0 {
            return PoleLimit::Unbounded;
        }
        if order > 0 {
            return PoleLimit::Finite(RatFn::zero());
        }
        let num0 = self.num.shift_down(var, p).coeff_for_power(var, 0);
        let factors: Vec<(LinExpr, u32)> = self
            .den
            .iter()
            .filter(|(f, _)| **f != v_factor)
            .map(|(f, m)| (f.subs_zero(var), *m))
            .collect();
        PoleLimit::Finite(RatFn::new(num0, factors))
    }

    /// `lim_{var -> at} (var - at)^k * f`, via the shift `var = w + at`.
    pub fn limit_shifted_times_power(&self, var: &Symbol, at: &Rational, k: u32) -> PoleLimit {
        let w = Symbol::new("w");
        let shifted = self.subs_affine(var, &LinExpr::affine(&w, Rational::from(1), at.clone()));
        shifted.limit_times_power(&w, k)
    }
}

impl Add for &RatFn {
    type Output = RatFn;
    fn add(self, rhs: &RatFn) -> RatFn {
        RatFn::add(self, rhs)
    }
}

impl Add for RatFn {
    type Output = RatFn;
    fn add(self, rhs: RatFn) -> RatFn {
        RatFn::add(&self, &rhs)
    }
}

impl Sub for &RatFn {
    type Output = RatFn;
    fn sub(self, rhs: &RatFn) -> RatFn {
        RatFn::sub(self, rhs)
    }
}

impl Sub for RatFn {
    type Output = RatFn;
    fn sub(self, rhs: RatFn) -> RatFn {
        RatFn::sub(&self, &rhs)
    }
}

impl Mul for &RatFn {
    type Output = RatFn;
    fn mul(self, rhs: &RatFn) -> RatFn {
        RatFn::mul(self, rhs)
    }
}

impl Mul for RatFn {
    type Output = RatFn;
    fn mul(self, rhs: RatFn) -> RatFn {
        RatFn::mul(&self, &rhs)
    }
}

impl Neg for &RatFn {
    type Output = RatFn;
    fn neg(self) -> RatFn {
        RatFn::neg(self)
    }
}

impl Neg for RatFn {
    type Output = RatFn;
    fn neg(self) -> RatFn {
        RatFn::neg(&self)
    }
}

impl num_traits::Zero for RatFn {
    fn zero() -> Self {
        RatFn::zero()
    }
    fn is_zero(&self) -> bool {
        RatFn::is_zero(self)
    }
}

impl num_traits::One for RatFn {
    fn one() -> Self {
        RatFn::one()
    }
}

impl fmt::Display for RatFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_empty() {
            return write!(f, "{}", self.num);
        }
        let den: Vec<String> = self
            .den
            .iter()
            .map(|(fac, m)| {
                if *m == 1 {
                    format!("({fac})")
                } else {
                    format!("({fac})^{m}")
                }
            })
            .collect();
        write!(f, "({}) / ({})", self.num, den.join("*"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{rat, rat_int};

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn partial_fraction_sum() {
        let t = sym("t");
        // 1/t + 1/(1-t) == 1 / (t(1-t)), i.e. -1 / (t(t-1)) in canonical form.
        let a = RatFn::new(Poly::one(), vec![(LinExpr::from_symbol(&t), 1)]);
        let b = RatFn::new(
            Poly::one(),
            vec![(LinExpr::affine(&t, rat_int(-1), rat_int(1)), 1)],
        );
        let sum = a.add(&b);
        let expected = RatFn::new(
            Poly::constant(rat_int(-1)),
            vec![
                (LinExpr::from_symbol(&t), 1),
                (LinExpr::affine(&t, rat_int(1), rat_int(-1)), 1),
            ],
        );
        assert_eq!(sum, expected);
    }

    #[test]
    fn cancellation_is_exact() {
        let x = sym("x");
        let y = sym("y");
        let lx = LinExpr::from_symbol(&x);
        let ly = LinExpr::from_symbol(&y);
        // (x + y)/(x*y) - 1/y - 1/x == 0
        let num = Poly::from_symbol(&x).add(&Poly::from_symbol(&y));
        let f = RatFn::new(num, vec![(lx.clone(), 1), (ly.clone(), 1)]);
        let g = RatFn::new(Poly::one(), vec![(ly, 1)]);
        let h = RatFn::new(Poly::one(), vec![(lx, 1)]);
        assert!(f.sub(&g).sub(&h).is_zero());
    }

    #[test]
    fn normalization_folds_scales_into_numerator() {
        let x = sym("x");
        // 1/(2x - 1) == (1/2) / (x - 1/2); both spellings must agree.
        let a = RatFn::new(
            Poly::one(),
            vec![(LinExpr::affine(&x, rat_int(2), rat_int(-1)), 1)],
        );
        let b = RatFn::new(
            Poly::constant(rat(1, 2)),
            vec![(LinExpr::affine(&x, rat_int(1), rat(-1, 2)), 1)],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn eval_detects_poles() {
        let x = sym("x");
        let f = RatFn::new(Poly::one(), vec![(LinExpr::from_symbol(&x), 1)]);
        assert_eq!(f.eval(&[(x.clone(), rat(1, 2))]), Some(rat_int(2)));
        assert_eq!(f.eval(&[(x, rat_int(0))]), None);
    }

    #[test]
    fn limit_simple_pole() {
        let u = sym("u");
        let t = sym("t");
        // f = 1/(u * t): lim u*f = 1/t, lim u^2*f = 0.
        let f = RatFn::new(
            Poly::one(),
            vec![
                (LinExpr::from_symbol(&u), 1),
                (LinExpr::from_symbol(&t), 1),
            ],
        );
        let first = f.limit_times_power(&u, 1).finite().unwrap();
        let expected = RatFn::new(Poly::one(), vec![(LinExpr::from_symbol(&t), 1)]);
        assert_eq!(first, expected);
        let second = f.limit_times_power(&u, 2).finite().unwrap();
        assert!(second.is_zero());
    }

    #[test]
    fn limit_double_pole_is_unbounded() {
        let u = sym("u");
        let t = sym("t");
        // f = 1/(u^2 * t): lim u*f diverges, lim u^2*f = 1/t.
        let f = RatFn::new(
            Poly::one(),
            vec![
                (LinExpr::from_symbol(&u), 2),
                (LinExpr::from_symbol(&t), 1),
            ],
        );
        assert_eq!(f.limit_times_power(&u, 1), PoleLimit::Unbounded);
        let second = f.limit_times_power(&u, 2).finite().unwrap();
        let expected = RatFn::new(Poly::one(), vec![(LinExpr::from_symbol(&t), 1)]);
        assert_eq!(second, expected);
    }

    #[test]
    fn limit_uses_numerator_vanishing_order() {
        let u = sym("u");
        let t = sym("t");
        // f = u / (u * (u + t)): lim u^0 * f ... as u -> 0 gives 1/t.
        let f = RatFn::new(
            Poly::from_symbol(&u),
            vec![
                (LinExpr::from_symbol(&u), 1),
                (
                    LinExpr::new(
                        vec![(u.clone(), rat_int(1)), (t.clone(), rat_int(1))],
                        Rational::new(),
                    ),
                    1,
                ),
            ],
        );
        let out = f.limit_times_power(&u, 0).finite().unwrap();
        let expected = RatFn::new(Poly::one(), vec![(LinExpr::from_symbol(&t), 1)]);
        assert_eq!(out, expected);
    }

    #[test]
    fn shifted_limit_reads_residue() {
        let t = sym("t");
        // g = 1/(t(t-1)): residue at t=0 is -1, at t=1 is +1.
        let g = RatFn::new(
            Poly::one(),
            vec![
                (LinExpr::from_symbol(&t), 1),
                (LinExpr::affine(&t, rat_int(1), rat_int(-1)), 1),
            ],
        );
        let at0 = g
            .limit_shifted_times_power(&t, &rat_int(0), 1)
            .finite()
            .unwrap();
        assert_eq!(at0.as_constant(), Some(rat_int(-1)));
        let at1 = g
            .limit_shifted_times_power(&t, &rat_int(1), 1)
            .finite()
            .unwrap();
        assert_eq!(at1.as_constant(), Some(rat_int(1)));
    }

    #[test]
    fn affine_substitution_keeps_factored_denominator() {
        let x = sym("x");
        let y = sym("y");
        let u = sym("u");
        let t = sym("t");
        // 1/(x*y) with x := u, y := t is 1/(u*t).
        let f = RatFn::new(
            Poly::one(),
            vec![
                (LinExpr::from_symbol(&x), 1),
                (LinExpr::from_symbol(&y), 1),
            ],
        );
        let g = f
            .subs_affine(&x, &LinExpr::from_symbol(&u))
            .subs_affine(&y, &LinExpr::from_symbol(&t));
        let expected = RatFn::new(
            Poly::one(),
            vec![
                (LinExpr::from_symbol(&u), 1),
                (LinExpr::from_symbol(&t), 1),
            ],
        );
        assert_eq!(g, expected);
    }
}
