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
use crate::symbolic::symbol::Symbol;

/// Sparse multivariate polynomial with exact rational coefficients.
///
/// Variables are kept sorted and deduplicated; each term key is an exponent
/// vector aligned with `vars`. Zero coefficients and unused variables are
/// pruned after every operation, so structural equality is canonical: two
/// polynomials are `==` exactly when they are the same polynomial over the
/// same symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    vars: Vec<Symbol>,
    terms: BTreeMap<Vec<u32>, Rational>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly {
            vars: Vec::new(),
            terms: BTreeMap::new(),
        }
    }

    pub fn one() -> Self {
        Poly::constant(Rational::from(1))
    }

    pub fn constant(c: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if c.cmp0() != Ordering::Equal {
            terms.insert(Vec::new(), c);
        }
        Poly {
            vars: Vec::new(),
            terms,
        }
    }

    pub fn from_symbol(s: &Symbol) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(vec![1], Rational::from(1));
        Poly {
            vars: vec![s.clone()],
            terms,
        }
    }

    pub fn vars(&self) -> &[Symbol] {
        &self.vars
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn as_constant(&self) -> Option<Rational> {
        if self.is_zero() {
            return Some(Rational::new());
        }
        if self.vars.is_empty() {
            return self.terms.get(&Vec::new()).cloned();
        }
        None
    }

    /// Drops zero coefficients and variables that no longer occur. Dropping
    /// an all-zero exponent column never merges distinct keys, so the term
    /// map stays well-formed.
    fn normalized(vars: Vec<Symbol>, terms: BTreeMap<Vec<u32>, Rational>) -> Poly {
        let terms: BTreeMap<Vec<u32>, Rational> = terms
            .into_iter()
            .filter(|(_, c)| c.cmp0() != Ordering::Equal)
            .collect();

        let used: Vec<bool> = (0..vars.len())
            .map(|i| terms.keys().any(|e| e[i] != 0))
            .collect();
        if used.iter().all(|&u| u) {
            return Poly { vars, terms };
        }

        let kept_vars: Vec<Symbol> = vars
            .iter()
            .zip(&used)
            .filter(|&(_, &u)| u)
            .map(|(v, _)| v.clone())
            .collect();
        let terms = terms
            .into_iter()
            .map(|(e, c)| {
                let ne: Vec<u32> = e
                    .iter()
                    .zip(&used)
                    .filter(|&(_, &u)| u)
                    .map(|(&k, _)| k)
                    .collect();
                (ne, c)
            })
            .collect();
        Poly {
            vars: kept_vars,
            terms,
        }
    }

    fn merged_vars(a: &Poly, b: &Poly) -> Vec<Symbol> {
        let mut vars = a.vars.clone();
        for v in &b.vars {
            if !vars.contains(v) {
                vars.push(v.clone());
            }
        }
        vars.sort();
        vars
    }

    fn remapped_terms(&self, vars: &[Symbol]) -> BTreeMap<Vec<u32>, Rational> {
        let idx: Vec<usize> = self
            .vars
            .iter()
            .map(|v| {
                vars.iter()
                    .position(|w| w == v)
                    .expect("remap target must contain all variables")
            })
            .collect();
        self.terms
            .iter()
            .map(|(e, c)| {
                let mut ne = vec![0u32; vars.len()];
                for (i, &k) in e.iter().enumerate() {
                    ne[idx[i]] = k;
                }
                (ne, c.clone())
            })
            .collect()
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let vars = Poly::merged_vars(self, other);
        let mut terms = self.remapped_terms(&vars);
        for (e, c) in other.remapped_terms(&vars) {
            let entry = terms.entry(e).or_insert_with(Rational::new);
            *entry += &c;
        }
        Poly::normalized(vars, terms)
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Poly {
        let terms = self
            .terms
            .iter()
            .map(|(e, c)| {
                let mut nc = c.clone();
                nc = -nc;
                (e.clone(), nc)
            })
            .collect();
        Poly {
            vars: self.vars.clone(),
            terms,
        }
    }

    pub fn scale(&self, k: &Rational) -> Poly {
        if k.cmp0() == Ordering::Equal {
            return Poly::zero();
        }
        let terms = self
            .terms
            .iter()
            .map(|(e, c)| {
                let mut nc = c.clone();
                nc *= k;
                (e.clone(), nc)
            })
            .collect();
        Poly {
            vars: self.vars.clone(),
            terms,
        }
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let vars = Poly::merged_vars(self, other);
        let ta = self.remapped_terms(&vars);
        let tb = other.remapped_terms(&vars);
        let mut terms: BTreeMap<Vec<u32>, Rational> = BTreeMap::new();
        for (ea, ca) in &ta {
            for (eb, cb) in &tb {
                let e: Vec<u32> = ea.iter().zip(eb).map(|(x, y)| x + y).collect();
                let mut prod = ca.clone();
                prod *= cb;
                let entry = terms.entry(e).or_insert_with(Rational::new);
                *entry += &prod;
            }
        }
        Poly::normalized(vars, terms)
    }

    pub fn pow(&self, exp: u32) -> Poly {
        let mut acc = Poly::one();
        for _ in 0..exp {
            acc = Poly::mul(&acc, self);
        }
        acc
    }

    /// Exact evaluation. Panics on an unbound variable: an incomplete
    /// binding list is a caller bug, not an input condition.
    pub fn eval(&self, bindings: &[(Symbol, Rational)]) -> Rational {
        let vals: Vec<&Rational> = self
            .vars
            .iter()
            .map(|v| {
                bindings
                    .iter()
                    .find(|(s, _)| s == v)
                    .map(|(_, r)| r)
                    .unwrap_or_else(|| panic!("unbound symbol `{v}` in polynomial evaluation"))
            })
            .collect();
        let mut acc = Rational::new();
        for (e, c) in &self.terms {
            let mut term = c.clone();
            for (i, &k) in e.iter().enumerate() {
                if k > 0 {
                    term *= pow_rat(vals[i], k);
                }
            }
            acc += &term;
        }
        acc
    }

    pub fn diff(&self, var: &Symbol) -> Poly {
        let Some(i) = self.vars.iter().position(|v| v == var) else {
            return Poly::zero();
        };
        let mut terms: BTreeMap<Vec<u32>, Rational> = BTreeMap::new();
        for (e, c) in &self.terms {
            if e[i] == 0 {
                continue;
            }
            let mut ne = e.clone();
            ne[i] -= 1;
            let mut nc = c.clone();
            nc *= Rational::from(e[i]);
            let entry = terms.entry(ne).or_insert_with(Rational::new);
            *entry += &nc;
        }
        Poly::normalized(self.vars.clone(), terms)
    }

    pub fn degree_in(&self, var: &Symbol) -> u32 {
        let Some(i) = self.vars.iter().position(|v| v == var) else {
            return 0;
        };
        self.terms.keys().map(|e| e[i]).max().unwrap_or(0)
    }

    pub fn min_degree_in(&self, var: &Symbol) -> u32 {
        let Some(i) = self.vars.iter().position(|v| v == var) else {
            return 0;
        };
        self.terms.keys().map(|e| e[i]).min().unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.terms
            .keys()
            .map(|e| e.iter().sum())
            .max()
            .unwrap_or(0)
    }

    /// Coefficient of `var^k`, as a polynomial in the remaining variables.
    pub fn coeff_for_power(&self, var: &Symbol, k: u32) -> Poly {
        let Some(i) = self.vars.iter().position(|v| v == var) else {
            return if k == 0 { self.clone() } else { Poly::zero() };
        };
        let mut rest_vars = self.vars.clone();
        rest_vars.remove(i);
        let terms = self
            .terms
            .iter()
            .filter(|(e, _)| e[i] == k)
            .map(|(e, c)| {
                let mut ne = e.clone();
                ne.remove(i);
                (ne, c.clone())
            })
            .collect();
        Poly::normalized(rest_vars, terms)
    }

    pub fn coeffs_by_power(&self, var: &Symbol) -> Vec<Poly> {
        let d = self.degree_in(var);
        (0..=d).map(|k| self.coeff_for_power(var, k)).collect()
    }

    /// Divides by `var^k`. Caller guarantees every term has `var`-degree
    /// at least `k`.
    pub fn shift_down(&self, var: &Symbol, k: u32) -> Poly {
        if k == 0 {
            return self.clone();
        }
        let i = self
            .vars
            .iter()
            .position(|v| v == var)
            .expect("shift_down variable must occur in the polynomial");
        let terms = self
            .terms
            .iter()
            .map(|(e, c)| {
                debug_assert!(e[i] >= k);
                let mut ne = e.clone();
                ne[i] -= k;
                (ne, c.clone())
            })
            .collect();
        Poly::normalized(self.vars.clone(), terms)
    }

    /// Substitutes `var := repl`. The replacement must not contain `var`.
    pub fn subs(&self, var: &Symbol, repl: &Poly) -> Poly {
        debug_assert!(!repl.vars.contains(var));
        let Some(i) = self.vars.iter().position(|v| v == var) else {
            return self.clone();
        };
        let mut rest_vars = self.vars.clone();
        rest_vars.remove(i);

        let mut acc = Poly::zero();
        for (e, c) in &self.terms {
            let k = e[i];
            let mut ne = e.clone();
            ne.remove(i);
            let mut mono_terms = BTreeMap::new();
            mono_terms.insert(ne, c.clone());
            let mono = Poly::normalized(rest_vars.clone(), mono_terms);
            acc = Poly::add(&acc, &Poly::mul(&mono, &repl.pow(k)));
        }
        acc
    }

    /// Exact division by a linear polynomial; `None` when the remainder is
    /// nonzero. Synthetic division in the first divisor variable, with
    /// coefficients in the polynomial ring over the remaining variables.
    pub fn div_exact_linear(&self, lin: &Poly) -> Option<Poly> {
        assert!(
            lin.total_degree() == 1,
            "div_exact_linear divisor must be linear, got `{lin}`"
        );
        if self.is_zero() {
            return Some(Poly::zero());
        }

        // A total-degree-1 polynomial always has a pure degree-1 key.
        let (v, c) = lin
            .vars
            .iter()
            .enumerate()
            .find_map(|(i, v)| {
                let mut key = vec![0u32; lin.vars.len()];
                key[i] = 1;
                lin.terms.get(&key).map(|c| (v.clone(), c.clone()))
            })
            .expect("linear divisor has a leading variable");
        let r = lin.sub(&Poly::from_symbol(&v).scale(&c));

        let d = self.degree_in(&v) as usize;
        if d == 0 {
            return None;
        }

        let mut coeffs = self.coeffs_by_power(&v);
        let cinv = c.recip();
        let mut quot = vec![Poly::zero(); d];
        for k in (1..=d).rev() {
            let qk = coeffs[k].scale(&cinv);
            coeffs[k - 1] = Poly::sub(&coeffs[k - 1], &Poly::mul(&qk, &r));
            quot[k - 1] = qk;
        }
        if !coeffs[0].is_zero() {
            return None;
        }

        let vp = Poly::from_symbol(&v);
        let mut out = Poly::zero();
        for (k, qk) in quot.into_iter().enumerate() {
            out = Poly::add(&out, &Poly::mul(&qk, &vp.pow(k as u32)));
        }
        Some(out)
    }
}

impl Add for &Poly {
    type Output = Poly;
    fn add(self, rhs: &Poly) -> Poly {
        Poly::add(self, rhs)
    }
}

impl Add for Poly {
    type Output = Poly;
    fn add(self, rhs: Poly) -> Poly {
        Poly::add(&self, &rhs)
    }
}

impl Sub for &Poly {
    type Output = Poly;
    fn sub(self, rhs: &Poly) -> Poly {
        Poly::sub(self, rhs)
    }
}

impl Sub for Poly {
    type Output = Poly;
    fn sub(self, rhs: Poly) -> Poly {
        Poly::sub(&self, &rhs)
    }
}

impl Mul for &Poly {
    type Output = Poly;
    fn mul(self, rhs: &Poly) -> Poly {
        Poly::mul(self, rhs)
    }
}

impl Mul for Poly {
    type Output = Poly;
    fn mul(self, rhs: Poly) -> Poly {
        Poly::mul(&self, &rhs)
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        Poly::neg(self)
    }
}

impl Neg for Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        Poly::neg(&self)
    }
}

impl num_traits::Zero for Poly {
    fn zero() -> Self {
        Poly::zero()
    }
    fn is_zero(&self) -> bool {
        Poly::is_zero(self)
    }
}

impl num_traits::One for Poly {
    fn one() -> Self {
        Poly::one()
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        // Highest exponent vectors first reads closest to handwritten form.
        for (e, c) in self.terms.iter().rev() {
            let mut piece = String::new();
            let has_vars = e.iter().any(|&k| k > 0);
            let abs = c.clone().abs();
            if !has_vars || abs != Rational::from(1) {
                piece.push_str(&abs.to_string());
            }
            for (i, &k) in e.iter().enumerate() {
                if k == 0 {
                    continue;
                }
                if !piece.is_empty() {
                    piece.push('*');
                }
                piece.push_str(self.vars[i].name());
                if k > 1 {
                    piece.push_str(&format!("^{k}"));
                }
            }
            let negative = c.cmp0() == Ordering::Less;
            if first {
                if negative {
                    write!(f, "-{piece}")?;
                } else {
                    write!(f, "{piece}")?;
                }
                first = false;
            } else if negative {
                write!(f, " - {piece}")?;
            } else {
                write!(f, " + {piece}")?;
            }
        }
        Ok(())
    }
}
