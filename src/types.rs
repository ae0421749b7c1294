//! Core value types shared by the rollout, evaluation and scheduling engines.
//!
//! Defines the agent families, action/distribution shapes, value estimates
//! and environment mode used throughout the driver.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Learning family of the controlled agent.
///
/// Decides which forward pass the engines call and how actions are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AgentKind {
    /// Single actor-critic controlling every entity with one distribution.
    #[cfg_attr(feature = "serde", serde(rename = "a2c"))]
    PolicyGradientSingle,
    /// One actor-critic per entity, coordinated through fingerprints.
    #[cfg_attr(feature = "serde", serde(rename = "ma2c"))]
    PolicyGradientMulti,
    /// Independent Q-learning style agents (off-policy).
    #[cfg_attr(feature = "serde", serde(rename = "iql", alias = "iqld", alias = "iqll"))]
    ValueBased,
    /// Fixed heuristic controller; never learns.
    #[cfg_attr(feature = "serde", serde(rename = "greedy"))]
    Greedy,
}

impl AgentKind {
    /// Returns true for the on-policy actor-critic families.
    pub fn is_policy_gradient(&self) -> bool {
        matches!(
            self,
            AgentKind::PolicyGradientSingle | AgentKind::PolicyGradientMulti
        )
    }

    /// Returns true when the environment fingerprint must track the policy.
    pub fn uses_fingerprint(&self) -> bool {
        matches!(self, AgentKind::PolicyGradientMulti)
    }

    /// Short name used in logs and in the reward table.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::PolicyGradientSingle => "a2c",
            AgentKind::PolicyGradientMulti => "ma2c",
            AgentKind::ValueBased => "iql",
            AgentKind::Greedy => "greedy",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown agent or policy-type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} name: {name}")]
pub struct ParseNameError {
    kind: &'static str,
    name: String,
}

impl FromStr for AgentKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a2c" => Ok(AgentKind::PolicyGradientSingle),
            "ma2c" => Ok(AgentKind::PolicyGradientMulti),
            "iql" | "iqld" | "iqll" => Ok(AgentKind::ValueBased),
            "greedy" => Ok(AgentKind::Greedy),
            other => Err(ParseNameError {
                kind: "agent",
                name: other.to_string(),
            }),
        }
    }
}

/// Action-selection override used during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PolicyType {
    /// Keep each family's native behavior.
    #[default]
    Default,
    /// Pick the arg-max action of every distribution.
    Deterministic,
    /// Sample actions even for greedy/off-policy agents.
    Stochastic,
}

impl FromStr for PolicyType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(PolicyType::Default),
            "deterministic" => Ok(PolicyType::Deterministic),
            "stochastic" => Ok(PolicyType::Stochastic),
            other => Err(ParseNameError {
                kind: "policy type",
                name: other.to_string(),
            }),
        }
    }
}

/// Environment phase. Gates simulator-internal behavior such as demand
/// randomization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Test,
}

/// Action applied to the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// One discrete action for the whole system.
    Single(usize),
    /// One discrete action per agent.
    PerAgent(Vec<usize>),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Single(a) => write!(f, "{}", a),
            Action::PerAgent(actions) => write!(f, "{:?}", actions),
        }
    }
}

/// Action probability distributions produced by a policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Distributions {
    Single(Vec<f64>),
    PerAgent(Vec<Vec<f64>>),
}

impl Distributions {
    /// Number of independent distributions (1 for single-agent).
    pub fn arity(&self) -> usize {
        match self {
            Distributions::Single(_) => 1,
            Distributions::PerAgent(pis) => pis.len(),
        }
    }
}

/// Value estimates: a scalar for single-agent control or one per agent.
///
/// Also carries the bootstrap return `R` at the end of a segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Scalar(f64),
    PerAgent(Vec<f64>),
}

impl Values {
    /// Zero bootstrap shaped for the given agent family.
    pub fn zeros(kind: AgentKind, n_agent: usize) -> Self {
        match kind {
            AgentKind::PolicyGradientMulti => Values::PerAgent(vec![0.0; n_agent]),
            _ => Values::Scalar(0.0),
        }
    }

    /// Number of components (1 for scalar).
    pub fn arity(&self) -> usize {
        match self {
            Values::Scalar(_) => 1,
            Values::PerAgent(v) => v.len(),
        }
    }

    /// Variant and length, for shape checks.
    pub fn shape(&self) -> ValueShape {
        match self {
            Values::Scalar(_) => ValueShape::Scalar,
            Values::PerAgent(v) => ValueShape::PerAgent(v.len()),
        }
    }

    /// Returns true when every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Values::Scalar(v) => *v == 0.0,
            Values::PerAgent(vs) => vs.iter().all(|v| *v == 0.0),
        }
    }
}

/// Shape of a [`Values`]: a scalar, or a per-agent vector of given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Scalar,
    PerAgent(usize),
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Scalar => f.write_str("scalar"),
            ValueShape::PerAgent(n) => write!(f, "per-agent[{}]", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kind_parses_short_names() {
        assert_eq!("a2c".parse(), Ok(AgentKind::PolicyGradientSingle));
        assert_eq!("ma2c".parse(), Ok(AgentKind::PolicyGradientMulti));
        assert_eq!("iqld".parse(), Ok(AgentKind::ValueBased));
        assert_eq!("iqll".parse(), Ok(AgentKind::ValueBased));
        assert_eq!("greedy".parse(), Ok(AgentKind::Greedy));
        assert!("ppo".parse::<AgentKind>().is_err());
    }

    #[test]
    fn policy_type_parses() {
        assert_eq!("deterministic".parse(), Ok(PolicyType::Deterministic));
        assert_eq!(PolicyType::default(), PolicyType::Default);
        let err = "greedy".parse::<PolicyType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown policy type name: greedy");
    }

    #[test]
    fn family_predicates() {
        assert!(AgentKind::PolicyGradientSingle.is_policy_gradient());
        assert!(!AgentKind::PolicyGradientSingle.uses_fingerprint());
        assert!(AgentKind::PolicyGradientMulti.uses_fingerprint());
        assert!(!AgentKind::Greedy.is_policy_gradient());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_names_match_display() {
        for kind in [
            AgentKind::PolicyGradientSingle,
            AgentKind::PolicyGradientMulti,
            AgentKind::ValueBased,
            AgentKind::Greedy,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            let name: String = serde_json::from_str(&json).unwrap();
            assert_eq!(name.parse::<AgentKind>(), Ok(kind));
        }
        let kind: AgentKind = serde_json::from_str("\"iqld\"").unwrap();
        assert_eq!(kind, AgentKind::ValueBased);
    }

    #[test]
    fn zero_bootstrap_matches_arity() {
        assert_eq!(
            Values::zeros(AgentKind::PolicyGradientSingle, 4),
            Values::Scalar(0.0)
        );
        let multi = Values::zeros(AgentKind::PolicyGradientMulti, 4);
        assert_eq!(multi.arity(), 4);
        assert!(multi.is_zero());
    }
}
