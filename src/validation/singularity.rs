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

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

use crate::forms::canonical::Canonical2Form;
use crate::forms::residues::FacetChart;
use crate::geometry::region::Region2;
use crate::symbolic::linear::LinExpr;
use crate::symbolic::ratfn::{PoleLimit, RatFn};

pub const REASON_NON_BOUNDARY_POLE: &str = "non-boundary-pole";
pub const REASON_NON_SIMPLE_MULTIPLICITY: &str = "non-simple-multiplicity";
pub const REASON_CHART_ORDER_FAILED: &str = "chart-order-failed";

/// Local pole-order probe for one chart: `lim u·f` must be finite and
/// nonzero, `lim u²·f` must vanish exactly. A limit of `None` records a
/// non-finite value.
#[derive(Clone, Debug)]
pub struct ChartOrderCheck {
    pub facet_name: String,
    pub chart_name: String,
    pub first_order_limit: Option<RatFn>,
    pub second_order_limit: Option<RatFn>,
    pub failure_reasons: Vec<&'static str>,
}

impl ChartOrderCheck {
    pub fn passed(&self) -> bool {
        self.failure_reasons.is_empty()
    }
}

/// Detected pole structure of a candidate 2-form. Produced fresh per query;
/// carries no mutable state.
#[derive(Clone, Debug)]
pub struct SingularityReport {
    pub detected_pole_loci: Vec<LinExpr>,
    pub multiplicities: Vec<(LinExpr, u32)>,
    pub boundary_mapping_status: bool,
    pub local_chart_order_checks: Vec<ChartOrderCheck>,
    pub failure_reasons: Vec<&'static str>,
}

impl SingularityReport {
    pub fn passed(&self) -> bool {
        self.failure_reasons.is_empty()
    }
}

/// True when `locus` survives (normalized) as a denominator pole factor of
/// the form's reduced prefactor.
pub fn has_pole_locus(form: &Canonical2Form, locus: &LinExpr) -> bool {
    form.prefactor.has_pole_factor(locus)
}

fn chart_order_checks(
    form: &Canonical2Form,
    charts: &BTreeMap<String, Vec<FacetChart>>,
) -> Vec<ChartOrderCheck> {
    let mut checks = Vec::new();
    for (facet_name, facet_charts) in charts {
        for chart in facet_charts {
            let f_ut = form
                .prefactor
                .subs_affine(&form.x, &chart.x_of)
                .subs_affine(&form.y, &chart.y_of);

            let first = f_ut.limit_times_power(&chart.u, 1);
            let second = f_ut.limit_times_power(&chart.u, 2);

            let mut reasons: Vec<&'static str> = Vec::new();
            let first_order_limit = match first {
                PoleLimit::Finite(g) => {
                    if g.is_zero() {
                        reasons.push("chart-first-order-zero");
                    }
                    Some(g)
                }
                PoleLimit::Unbounded => {
                    reasons.push("chart-first-order-invalid");
                    None
                }
            };
            let second_order_limit = match second {
                PoleLimit::Finite(g) => {
                    if !g.is_zero() {
                        reasons.push("chart-second-order-nonzero");
                    }
                    Some(g)
                }
                PoleLimit::Unbounded => {
                    reasons.push("chart-second-order-invalid");
                    None
                }
            };

            checks.push(ChartOrderCheck {
                facet_name: facet_name.clone(),
                chart_name: chart.name.clone(),
                first_order_limit,
                second_order_limit,
                failure_reasons: reasons,
            });
        }
    }
    checks
}

/// Certifies the pole structure of a candidate 2-form against its region's
/// boundary: every reduced denominator factor must be proportional to a
/// region facet, every multiplicity must be exactly one, and every chart
/// must see a first-order pole and nothing more. The reduced prefactor
/// carries its denominator factored into normalized lines by construction,
/// so factor classification is a set comparison.
pub fn singularity_report(
    form: &Canonical2Form,
    region: &Region2,
    charts: &BTreeMap<String, Vec<FacetChart>>,
) -> SingularityReport {
    let multiplicities: Vec<(LinExpr, u32)> = form
        .prefactor
        .den_factors()
        .map(|(f, m)| (f.clone(), m))
        .collect();
    let detected_pole_loci: Vec<LinExpr> =
        multiplicities.iter().map(|(f, _)| f.clone()).collect();

    let boundary_factors: BTreeSet<LinExpr> = region
        .facets
        .values()
        .map(|line| line.normalized_expr())
        .collect();
    let boundary_mapping_status = detected_pole_loci
        .iter()
        .all(|locus| boundary_factors.contains(locus));

    let mut failure_reasons: Vec<&'static str> = Vec::new();
    if !boundary_mapping_status {
        failure_reasons.push(REASON_NON_BOUNDARY_POLE);
    }
    if multiplicities.iter().any(|(_, m)| *m != 1) {
        failure_reasons.push(REASON_NON_SIMPLE_MULTIPLICITY);
    }

    let local_chart_order_checks = chart_order_checks(form, charts);
    if local_chart_order_checks.iter().any(|c| !c.passed()) {
        failure_reasons.push(REASON_CHART_ORDER_FAILED);
    }

    SingularityReport {
        detected_pole_loci,
        multiplicities,
        boundary_mapping_status,
        local_chart_order_checks,
        failure_reasons,
    }
}

/// Raised by `assert_log_pure`; embeds per-factor multiplicities and
/// per-chart failure reasons so a violation is reproducible from the message
/// alone.
#[derive(Debug)]
pub struct LogPurityError {
    pub report: SingularityReport,
}

impl fmt::Display for LogPurityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut details: Vec<String> = Vec::new();
        for (factor, multiplicity) in &self.report.multiplicities {
            if *multiplicity != 1 {
                details.push(format!("multiplicity[{factor}]={multiplicity}"));
            }
        }
        for check in &self.report.local_chart_order_checks {
            if !check.passed() {
                details.push(format!(
                    "chart[{}/{}]={}",
                    check.facet_name,
                    check.chart_name,
                    check.failure_reasons.join(",")
                ));
            }
        }
        write!(
            f,
            "log-purity check failed: reasons=[{}]; details={}",
            self.report.failure_reasons.join(", "),
            if details.is_empty() {
                "none".to_string()
            } else {
                details.join("; ")
            }
        )
    }
}

impl Error for LogPurityError {}

/// Fail-fast wrapper around `singularity_report`.
pub fn assert_log_pure(
    form: &Canonical2Form,
    region: &Region2,
    charts: &BTreeMap<String, Vec<FacetChart>>,
) -> Result<SingularityReport, LogPurityError> {
    let report = singularity_report(form, region, charts);
    if report.passed() {
        Ok(report)
    } else {
        Err(LogPurityError { report })
    }
}
