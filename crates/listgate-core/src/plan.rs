// crates/listgate-core/src/plan.rs
// ============================================================================
// Module: Test-Plan Builder
// Description: Budgeted single- and multi-parameter check generation.
// Purpose: Turn derived value domains into an ordered, bounded check plan.
// Dependencies: crate::{check, domain, limits, param}, rand
// ============================================================================

//! ## Overview
//! The plan opens with the mandatory baseline schema check, follows with
//! single-parameter checks drawn from each bucketed domain under the
//! per-parameter budget, and closes with rejection-sampled multi-parameter
//! combinations. A combination is rejected when two chosen parameters share
//! a source property or when accepting it would push a parameter past the
//! fairness cap. Sampling attempts are bounded: once the attempt ceiling is
//! hit the plan is complete with fewer checks than requested, never an
//! unbounded loop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::check::Check;
use crate::check::CheckId;
use crate::check::CheckKind;
use crate::check::ParamBinding;
use crate::domain::ParamDomain;
use crate::domain::ValueDomain;
use crate::limits::Limits;
use crate::param::Param;
use crate::value::ParamValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Sampling attempts allowed per budgeted multi-parameter check before the
/// plan is declared complete. The fairness cap can shrink the valid
/// combination space to empty mid-sampling, so attempts must be bounded.
pub const PLAN_ATTEMPTS_PER_CHECK: usize = 64;

/// Total sampling attempts for the multi-parameter phase when the total
/// budget is unbounded.
pub const UNBUDGETED_MULTI_ATTEMPTS: usize = 4_096;

// ============================================================================
// SECTION: Plan Construction
// ============================================================================

/// Builds the ordered check plan from derived parameter domains.
///
/// `domains` is keyed by wire parameter name and only contains parameters
/// for which at least one baseline item exposed the property. Exposed so
/// plans can be inspected without a live endpoint.
pub fn build_plan<R: Rng>(
    params: &[Param],
    domains: &BTreeMap<String, ParamDomain>,
    limits: &Limits,
    min_multi_results: Option<usize>,
    rng: &mut R,
) -> Vec<Check> {
    let mut next_id = 1_u64;
    let mut allocate = move || {
        let id = CheckId::new(next_id);
        next_id += 1;
        id
    };

    let mut checks = vec![Check::new(allocate(), CheckKind::BaselineSchema)];
    for kind in single_param_kinds(params, domains, limits, rng) {
        checks.push(Check::new(allocate(), kind));
    }
    for kind in multi_param_kinds(params, domains, limits, min_multi_results, rng) {
        checks.push(Check::new(allocate(), kind));
    }
    checks
}

// ============================================================================
// SECTION: Single-Parameter Checks
// ============================================================================

/// Generates single-parameter check kinds in declared parameter order.
fn single_param_kinds<R: Rng>(
    params: &[Param],
    domains: &BTreeMap<String, ParamDomain>,
    limits: &Limits,
    rng: &mut R,
) -> Vec<CheckKind> {
    let budget = limits.max_single_checks_per_param;
    let mut kinds = Vec::new();
    for param in params {
        let Some(domain) = domains.get(&param.parameter) else {
            continue;
        };
        let values = if param.discrete {
            domain.bucketed.sample_discrete(budget, rng)
        } else {
            continuous_values(&domain.bucketed, budget, rng)
        };
        for value in values {
            kinds.push(CheckKind::SingleParam(ParamBinding {
                param: param.clone(),
                value,
            }));
        }
    }
    kinds
}

/// Samples continuous candidate values into a deduplicating set.
///
/// The target is `min(budget, |domain|)` (the full domain size when the
/// budget is unbounded); sampling stops early once the attempt ceiling is
/// reached, which keeps degenerate one-value ranges from looping.
fn continuous_values<R: Rng>(
    domain: &ValueDomain,
    budget: usize,
    rng: &mut R,
) -> Vec<ParamValue> {
    let target = if budget == 0 { domain.len() } else { budget.min(domain.len()) };
    let mut distinct: BTreeMap<String, ParamValue> = BTreeMap::new();
    let mut attempts = target.saturating_mul(PLAN_ATTEMPTS_PER_CHECK);
    while distinct.len() < target && attempts > 0 {
        attempts -= 1;
        let Some(value) = domain.sample_continuous(rng) else {
            break;
        };
        distinct.insert(value.to_wire(), value);
    }
    distinct.into_values().collect()
}

// ============================================================================
// SECTION: Multi-Parameter Checks
// ============================================================================

/// Generates multi-parameter check kinds by rejection sampling.
fn multi_param_kinds<R: Rng>(
    params: &[Param],
    domains: &BTreeMap<String, ParamDomain>,
    limits: &Limits,
    min_multi_results: Option<usize>,
    rng: &mut R,
) -> Vec<CheckKind> {
    let eligible: Vec<&Param> =
        params.iter().filter(|param| domains.contains_key(&param.parameter)).collect();
    if eligible.len() < 2 {
        return Vec::new();
    }

    let budget = limits.max_multi_checks;
    let fairness_cap = limits.max_multi_checks_involving_param;
    let probability = limits.acceptance_probability();
    let mut attempts = if budget == 0 {
        UNBUDGETED_MULTI_ATTEMPTS
    } else {
        budget.saturating_mul(PLAN_ATTEMPTS_PER_CHECK)
    };

    let mut involvement: BTreeMap<String, usize> = BTreeMap::new();
    let mut kinds = Vec::new();
    let mut indices: Vec<usize> = (0..eligible.len()).collect();

    while attempts > 0 && (budget == 0 || kinds.len() < budget) {
        attempts -= 1;
        indices.shuffle(rng);
        let subset_size = rng.gen_range(2..=eligible.len());
        let chosen = &indices[..subset_size];

        if has_duplicate_property(&eligible, chosen) {
            continue;
        }
        if probability < 1.0 && !rng.gen_bool(probability) {
            continue;
        }
        // Fairness rejection consumes an attempt but never the test budget.
        if fairness_cap > 0
            && chosen.iter().any(|&index| {
                involvement.get(&eligible[index].parameter).copied().unwrap_or(0) >= fairness_cap
            })
        {
            continue;
        }

        let Some(bindings) = bind_values(&eligible, chosen, domains, rng) else {
            continue;
        };
        for binding in &bindings {
            *involvement.entry(binding.param.parameter.clone()).or_insert(0) += 1;
        }
        kinds.push(CheckKind::MultiParam {
            bindings,
            min_results: min_multi_results,
        });
    }
    kinds
}

/// Returns true when two chosen parameters constrain the same property.
fn has_duplicate_property(eligible: &[&Param], chosen: &[usize]) -> bool {
    for (position, &left) in chosen.iter().enumerate() {
        for &right in &chosen[position + 1..] {
            if eligible[left].property == eligible[right].property {
                return true;
            }
        }
    }
    false
}

/// Assigns each chosen parameter a random value from its derived domain.
fn bind_values<R: Rng>(
    eligible: &[&Param],
    chosen: &[usize],
    domains: &BTreeMap<String, ParamDomain>,
    rng: &mut R,
) -> Option<Vec<ParamBinding>> {
    let mut bindings = Vec::with_capacity(chosen.len());
    for &index in chosen {
        let param = eligible[index];
        let domain = domains.get(&param.parameter)?;
        let value = if param.discrete {
            domain.raw.values().choose(rng).cloned()?
        } else {
            domain.raw.sample_continuous(rng)?
        };
        bindings.push(ParamBinding {
            param: param.clone(),
            value,
        });
    }
    Some(bindings)
}
