#![deny(warnings)]

//! Core domain models and invariants for the UBI household simulation.
//!
//! This crate defines the agent types (persons grouped into households), the
//! fiscal policy parameters they react to, the per-agent monthly update rule,
//! and validation helpers for boundary checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique, stable identifier of a person. Ids are dense integers assigned in
/// creation order and double as indices into the owning person store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u32);

/// Unique, stable identifier of a household. Same dense-index convention as
/// [`PersonId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u32);

/// Labor-income weeks per simulated month.
pub const WEEKS_PER_MONTH: f64 = 4.0;

/// Lower bound applied to sampled hourly wages (one-sided truncation, not a
/// re-sample, so the wage distribution has a point mass at the floor).
pub const WAGE_FLOOR: f64 = 600.0;

/// Hard lower bound on monthly labor supply.
pub const MIN_WORK_HOURS: f64 = 0.0;
/// Hard upper bound on monthly labor supply.
pub const MAX_WORK_HOURS: f64 = 60.0;

/// Weight on the previous period's hours in the labor-supply smoothing rule.
pub const HOURS_INERTIA: f64 = 0.7;

/// Guard against division by zero when deriving target hours from a wage.
pub const WAGE_EPSILON: f64 = 1e-6;

/// Fraction of disposable income saved each period; the remainder is
/// implicitly consumed and not tracked.
pub const SAVINGS_RATE: f64 = 0.2;

/// Hours beyond which the happiness proxy penalizes overwork.
pub const OVERWORK_THRESHOLD_HOURS: f64 = 40.0;

/// Fixed monthly subsistence cost every person tries to cover.
pub const BASIC_NEED: f64 = 150_000.0;

/// Monthly household income threshold for poverty classification.
pub const DEFAULT_POVERTY_LINE: f64 = 200_000.0;

/// Labor supply every person starts the simulation with.
pub const INITIAL_WORK_HOURS: f64 = 40.0;

/// Clamp a labor-supply value to the model's hard bounds.
pub fn clamp_work_hours(hours: f64) -> f64 {
    hours.clamp(MIN_WORK_HOURS, MAX_WORK_HOURS)
}

/// Apply the wage floor to a sampled hourly wage.
pub fn apply_wage_floor(wage: f64) -> f64 {
    wage.max(WAGE_FLOOR)
}

/// Monthly labor income of a person at its current wage and hours.
pub fn labor_income(person: &Person) -> f64 {
    person.hourly_wage * person.work_hours * WEEKS_PER_MONTH
}

/// Fiscal policy parameters, fixed for the duration of one run.
///
/// No validation happens at construction: an out-of-range tax rate is
/// accepted and produces an out-of-range disposable income. Boundary code
/// that wants checks calls [`validate_policy`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Policy {
    /// Flat monthly transfer paid to every person.
    pub ubi_amount: f64,
    /// Tax rate applied to total monthly income (labor + UBI).
    pub income_tax_rate: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            ubi_amount: 100_000.0,
            income_tax_rate: 0.2,
        }
    }
}

/// Cross-agent macro signals passed to every person update.
///
/// Currently empty: reserved for future fields such as an aggregate
/// unemployment rate. Present logic reads nothing from it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MacroState {}

/// An individual economic agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    /// Stable id, index into the owning person store.
    pub id: PersonId,
    /// Age in years, fixed after construction.
    pub age: u32,
    /// Hourly wage, >= [`WAGE_FLOOR`], never updated after construction.
    pub hourly_wage: f64,
    /// Monthly labor supply in [0, 60].
    pub work_hours: f64,
    /// Accumulated savings, non-decreasing while disposable income stays
    /// non-negative.
    pub saving: f64,
    /// Household this person belongs to, never reassigned.
    pub household_id: HouseholdId,
    /// Mood proxy, recomputed fresh each step.
    pub happiness: f64,
}

impl Person {
    /// Advance this person by one month: choose labor supply, earn, save,
    /// and refresh the happiness proxy. Infallible; all arithmetic is total.
    pub fn step(&mut self, policy: &Policy, _macro_state: &MacroState, basic_need: f64) {
        // Work only enough to cover the part of subsistence the UBI transfer
        // does not.
        let gap = (basic_need - policy.ubi_amount).max(0.0);
        let target_hours = gap / (self.hourly_wage * WEEKS_PER_MONTH + WAGE_EPSILON);

        // Smooth toward the target so labor supply never jumps between
        // periods.
        self.work_hours = clamp_work_hours(
            HOURS_INERTIA * self.work_hours + (1.0 - HOURS_INERTIA) * target_hours,
        );

        let income_labor = labor_income(self);
        let income_total = income_labor + policy.ubi_amount;

        let disposable_income = income_total * (1.0 - policy.income_tax_rate);
        self.saving += disposable_income * SAVINGS_RATE;

        self.happiness = 5.0 + 1e-5 * income_total
            - 0.05 * (self.work_hours - OVERWORK_THRESHOLD_HOURS).max(0.0);
    }
}

/// A group of persons whose labor income is pooled for poverty
/// classification. Membership is fixed at creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Household {
    /// Stable id, index into the owning household store.
    pub id: HouseholdId,
    /// Ordered member ids, resolved through the person store at aggregation
    /// time. The household never owns its members.
    pub member_ids: Vec<PersonId>,
    /// Pooled monthly labor income, recomputed each step.
    pub income: f64,
    /// Fixed threshold below which the household counts as poor.
    pub poverty_line: f64,
}

impl Household {
    /// Recompute pooled income from the members' current labor income.
    ///
    /// UBI transfers and savings are intentionally excluded: poverty status
    /// is classified on labor income only.
    ///
    /// Panics if a member id is absent from `persons`; membership is fixed
    /// at construction and persons are never removed, so a missing id means
    /// the ownership contract was broken upstream.
    pub fn aggregate(&mut self, persons: &[Person]) {
        self.income = self
            .member_ids
            .iter()
            .map(|pid| labor_income(&persons[pid.0 as usize]))
            .sum();
    }

    /// Pure poverty predicate over the last aggregated income.
    pub fn is_poor(&self) -> bool {
        self.income < self.poverty_line
    }
}

/// Population shape and RNG seed for one run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of households to create.
    pub n_households: usize,
    /// Persons created per household.
    pub persons_per_household: usize,
    /// Seed for the run's deterministic RNG.
    pub rng_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            n_households: 1000,
            persons_per_household: 2,
            rng_seed: 42,
        }
    }
}

/// Validation errors for boundary checks on policy and run configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Tax rate must be within [0, 1].
    #[error("income tax rate {0} is outside [0, 1]")]
    TaxRateOutOfRange(f64),
    /// UBI transfer must be non-negative.
    #[error("negative UBI amount: {0}")]
    NegativeTransfer(f64),
    /// Population must contain at least one household with one member.
    #[error("population is empty")]
    EmptyPopulation,
}

/// Validate a policy at the boundary. The engine itself accepts any values.
pub fn validate_policy(policy: &Policy) -> Result<(), ValidationError> {
    if !(policy.ubi_amount.is_finite() && policy.income_tax_rate.is_finite()) {
        return Err(ValidationError::NonFinite);
    }
    if !(0.0..=1.0).contains(&policy.income_tax_rate) {
        return Err(ValidationError::TaxRateOutOfRange(policy.income_tax_rate));
    }
    if policy.ubi_amount < 0.0 {
        return Err(ValidationError::NegativeTransfer(policy.ubi_amount));
    }
    Ok(())
}

/// Validate a run configuration.
pub fn validate_config(config: &SimConfig) -> Result<(), ValidationError> {
    if config.n_households == 0 || config.persons_per_household == 0 {
        return Err(ValidationError::EmptyPopulation);
    }
    Ok(())
}
