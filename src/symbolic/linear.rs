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

use rug::{Integer, Rational};

use crate::symbolic::poly::Poly;
use crate::symbolic::symbol::Symbol;

/// Affine expression `a1*s1 + ... + an*sn + c` with exact rational
/// coefficients over one or two symbols.
///
/// Serves double duty: ambient facet lines in `(x, y)` and chart-space
/// boundary maps in `(u, t)`. Terms are kept sorted by symbol with zero
/// coefficients dropped, so derived equality and ordering are canonical and
/// the type can key denominator-factor maps.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinExpr {
    terms: Vec<(Symbol, Rational)>,
    constant: Rational,
}

impl LinExpr {
    pub fn new(terms: Vec<(Symbol, Rational)>, constant: Rational) -> Self {
        let mut map: BTreeMap<Symbol, Rational> = BTreeMap::new();
        for (s, c) in terms {
            let entry = map.entry(s).or_insert_with(Rational::new);
            *entry += &c;
        }
        let terms = map
            .into_iter()
            .filter(|(_, c)| c.cmp0() != Ordering::Equal)
            .collect();
        LinExpr { terms, constant }
    }

    pub fn constant(c: Rational) -> Self {
        LinExpr {
            terms: Vec::new(),
            constant: c,
        }
    }

    pub fn from_symbol(s: &Symbol) -> Self {
        LinExpr {
            terms: vec![(s.clone(), Rational::from(1))],
            constant: Rational::new(),
        }
    }

    /// `a*s + b`.
    pub fn affine(s: &Symbol, a: Rational, b: Rational) -> Self {
        LinExpr::new(vec![(s.clone(), a)], b)
    }

    pub fn coeff(&self, s: &Symbol) -> Rational {
        self.terms
            .iter()
            .find(|(v, _)| v == s)
            .map(|(_, c)| c.clone())
            .unwrap_or_default()
    }

    pub fn constant_term(&self) -> &Rational {
        &self.constant
    }

    pub fn terms(&self) -> &[(Symbol, Rational)] {
        &self.terms
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.terms.iter().map(|(s, _)| s)
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty() && self.constant.cmp0() == Ordering::Equal
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn neg(&self) -> LinExpr {
        self.scale(&Rational::from(-1))
    }

    pub fn scale(&self, k: &Rational) -> LinExpr {
        if k.cmp0() == Ordering::Equal {
            return LinExpr::constant(Rational::new());
        }
        let terms = self
            .terms
            .iter()
            .map(|(s, c)| {
                let mut nc = c.clone();
                nc *= k;
                (s.clone(), nc)
            })
            .collect();
        let mut constant = self.constant.clone();
        constant *= k;
        LinExpr { terms, constant }
    }

    pub fn add(&self, other: &LinExpr) -> LinExpr {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        let mut constant = self.constant.clone();
        constant += &other.constant;
        LinExpr::new(terms, constant)
    }

    pub fn sub(&self, other: &LinExpr) -> LinExpr {
        self.add(&other.neg())
    }

    /// Exact evaluation; every symbol must be bound.
    pub fn eval(&self, bindings: &[(Symbol, Rational)]) -> Rational {
        let mut acc = self.constant.clone();
        for (s, c) in &self.terms {
            let v = bindings
                .iter()
                .find(|(b, _)| b == s)
                .map(|(_, r)| r)
                .unwrap_or_else(|| panic!("unbound symbol `{s}` in linear evaluation"));
            let mut term = c.clone();
            term *= v;
            acc += &term;
        }
        acc
    }

    /// Affine composition `self[var := repl]`; stays affine.
    pub fn subs(&self, var: &Symbol, repl: &LinExpr) -> LinExpr {
        let a = self.coeff(var);
        if a.cmp0() == Ordering::Equal {
            return self.clone();
        }
        let dropped = LinExpr {
            terms: self
                .terms
                .iter()
                .filter(|(s, _)| s != var)
                .cloned()
                .collect(),
            constant: self.constant.clone(),
        };
        dropped.add(&repl.scale(&a))
    }

    /// Drops the `var` term, i.e. evaluates at `var = 0`.
    pub fn subs_zero(&self, var: &Symbol) -> LinExpr {
        LinExpr {
            terms: self
                .terms
                .iter()
                .filter(|(s, _)| s != var)
                .cloned()
                .collect(),
            constant: self.constant.clone(),
        }
    }

    pub fn to_poly(&self) -> Poly {
        let mut p = Poly::constant(self.constant.clone());
        for (s, c) in &self.terms {
            p = p.add(&Poly::from_symbol(s).scale(c));
        }
        p
    }

    /// Canonical representative up to nonzero rational scale: coefficients
    /// cleared to coprime integers with the first nonzero (symbol order,
    /// then constant) positive. Returns `(canonical, scale)` with
    /// `self = scale * canonical`. A zero expression is returned unchanged
    /// with scale 1.
    pub fn normalized(&self) -> (LinExpr, Rational) {
        if self.is_zero() {
            return (self.clone(), Rational::from(1));
        }

        let coeffs: Vec<&Rational> = self
            .terms
            .iter()
            .map(|(_, c)| c)
            .chain(std::iter::once(&self.constant))
            .collect();

        let mut lcm = Integer::from(1);
        for c in &coeffs {
            if c.cmp0() != Ordering::Equal {
                lcm = lcm.lcm(c.denom());
            }
        }

        let ints: Vec<Integer> = coeffs
            .iter()
            .map(|c| {
                let mut scaled = (*c).clone();
                scaled *= Rational::from(&lcm);
                scaled.numer().clone()
            })
            .collect();

        let mut gcd = Integer::new();
        for i in &ints {
            gcd = gcd.gcd(i);
        }

        let sign = ints
            .iter()
            .find(|i| i.cmp0() != Ordering::Equal)
            .map(|i| {
                if i.cmp0() == Ordering::Less {
                    Rational::from(-1)
                } else {
                    Rational::from(1)
                }
            })
            .expect("nonzero expression has a nonzero coefficient");

        // self = scale * canonical, canonical_i = c_i * lcm/gcd * sign.
        let mut unit = Rational::from((lcm, gcd));
        unit *= &sign;
        let canonical = self.scale(&unit);
        let scale = unit.recip();
        (canonical, scale)
    }
}

impl fmt::Display for LinExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (s, c) in &self.terms {
            let abs = c.clone().abs();
            let piece = if abs == Rational::from(1) {
                s.name().to_string()
            } else {
                format!("{abs}*{}", s.name())
            };
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
        if self.constant.cmp0() != Ordering::Equal {
            let abs = self.constant.clone().abs();
            if first {
                write!(f, "{}", self.constant)?;
            } else if self.constant.cmp0() == Ordering::Less {
                write!(f, " - {abs}")?;
            } else {
                write!(f, " + {abs}")?;
            }
        }
        Ok(())
    }
}
