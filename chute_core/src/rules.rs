//! Rule base: input variables, antecedent trees and the reference rules.

use crate::error::FuzzyError;
use crate::membership::MembershipFunction;
use crate::variable::{LinguisticVariable, Universe};

/// The five inputs of the inference step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputVar {
    Severity,
    PitchTrend,
    Proximity,
    Acceleration,
    Altitude,
}

impl InputVar {
    pub const ALL: [Self; 5] = [
        Self::Severity,
        Self::PitchTrend,
        Self::Proximity,
        Self::Acceleration,
        Self::Altitude,
    ];
}

/// Antecedent tree. AND = min, OR = max, NOT = 1 - x.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleExpr {
    Leaf { var: InputVar, term: String },
    And(Vec<RuleExpr>),
    Or(Vec<RuleExpr>),
    Not(Box<RuleExpr>),
}

impl RuleExpr {
    pub fn is(var: InputVar, term: impl Into<String>) -> Self {
        Self::Leaf {
            var,
            term: term.into(),
        }
    }

    pub fn and(children: impl IntoIterator<Item = RuleExpr>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = RuleExpr>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: RuleExpr) -> Self {
        Self::Not(Box::new(child))
    }

    /// Firing strength given a leaf lookup. An empty AND reads as 1 and an
    /// empty OR as 0.
    pub fn eval<F>(&self, leaf: &F) -> f64
    where
        F: Fn(InputVar, &str) -> f64,
    {
        match self {
            Self::Leaf { var, term } => leaf(*var, term),
            Self::And(children) => children.iter().map(|c| c.eval(leaf)).fold(1.0, f64::min),
            Self::Or(children) => children.iter().map(|c| c.eval(leaf)).fold(0.0, f64::max),
            Self::Not(child) => 1.0 - child.eval(leaf),
        }
    }

    fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(InputVar, &'a str)) {
        match self {
            Self::Leaf { var, term } => f(*var, term),
            Self::And(children) | Self::Or(children) => {
                for c in children {
                    c.for_each_leaf(f);
                }
            }
            Self::Not(child) => child.for_each_leaf(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub label: String,
    pub antecedent: RuleExpr,
    /// Term of the output (Risk) variable.
    pub consequent: String,
}

impl Rule {
    pub fn new(label: impl Into<String>, antecedent: RuleExpr, consequent: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            antecedent,
            consequent: consequent.into(),
        }
    }
}

/// One linguistic variable per `InputVar`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputVariables {
    pub severity: LinguisticVariable,
    pub pitch_trend: LinguisticVariable,
    pub proximity: LinguisticVariable,
    pub acceleration: LinguisticVariable,
    pub altitude: LinguisticVariable,
}

impl InputVariables {
    pub fn get(&self, var: InputVar) -> &LinguisticVariable {
        match var {
            InputVar::Severity => &self.severity,
            InputVar::PitchTrend => &self.pitch_trend,
            InputVar::Proximity => &self.proximity,
            InputVar::Acceleration => &self.acceleration,
            InputVar::Altitude => &self.altitude,
        }
    }
}

/// Validated, immutable rule base. Shared between runs through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    inputs: InputVariables,
    output: LinguisticVariable,
    rules: Vec<Rule>,
    /// Index of each rule's consequent term in `output`.
    consequents: Vec<usize>,
}

impl RuleBase {
    /// Check every leaf and consequent against the variables.
    pub fn new(
        inputs: InputVariables,
        output: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> Result<Self, FuzzyError> {
        let mut consequents = Vec::with_capacity(rules.len());
        for rule in &rules {
            let mut unknown = None;
            rule.antecedent.for_each_leaf(&mut |var, term| {
                let v = inputs.get(var);
                if unknown.is_none() && v.term(term).is_none() {
                    unknown = Some(FuzzyError::UnknownTerm {
                        variable: v.name().to_string(),
                        term: term.to_string(),
                    });
                }
            });
            if let Some(e) = unknown {
                return Err(e);
            }
            let idx = output
                .term_index(&rule.consequent)
                .ok_or_else(|| FuzzyError::UnknownTerm {
                    variable: output.name().to_string(),
                    term: rule.consequent.clone(),
                })?;
            consequents.push(idx);
        }
        Ok(Self {
            inputs,
            output,
            rules,
            consequents,
        })
    }

    /// The fall-risk rule base: five inputs, Risk output, five rules.
    pub fn reference() -> Result<Self, FuzzyError> {
        let tri = MembershipFunction::triangular;

        let severity = LinguisticVariable::new("Severity", Universe::range(0.0, 100.0, 1.0)?)
            .with_term("Suave", tri(0.0, 0.0, 50.0)?)?
            .with_term("Moderado", tri(20.0, 50.0, 80.0)?)?
            .with_term("Crítico", tri(60.0, 100.0, 100.0)?)?;
        let pitch_trend =
            LinguisticVariable::new("PitchTrend", Universe::range(-90.0, 90.0, 1.0)?)
                .with_term("Negativo", tri(-90.0, -90.0, -8.0)?)?
                .with_term("Neutro", tri(-15.0, 0.0, 15.0)?)?
                .with_term("Positivo", tri(8.0, 90.0, 90.0)?)?;
        let proximity = LinguisticVariable::new("Proximity", Universe::range(0.0, 1.0, 0.01)?)
            .with_term("Baixa", tri(0.0, 0.0, 0.5)?)?
            .with_term("Media", tri(0.3, 0.6, 0.9)?)?
            .with_term("Alta", tri(0.6, 1.0, 1.0)?)?;
        let acceleration =
            LinguisticVariable::new("Acceleration", Universe::range(-15.0, 5.0, 0.1)?)
                .with_term("Leve", tri(-5.0, 0.0, 5.0)?)?
                .with_term("Moderada", tri(-10.0, -7.0, -3.0)?)?
                .with_term("Acentuada", tri(-15.0, -12.0, -8.0)?)?;
        let altitude = LinguisticVariable::new("Altitude", Universe::range(0.0, 1000.0, 1.0)?)
            .with_term("Baixa", tri(0.0, 0.0, 300.0)?)?
            .with_term("Média", tri(200.0, 500.0, 800.0)?)?
            .with_term("Alta", tri(600.0, 1000.0, 1000.0)?)?;
        let risk = LinguisticVariable::new("Risk", Universe::range(0.0, 100.0, 1.0)?)
            .with_term("Baixo", tri(0.0, 0.0, 40.0)?)?
            .with_term("Moderado", tri(20.0, 50.0, 80.0)?)?
            .with_term("Alto", tri(70.0, 100.0, 100.0)?)?;

        use InputVar::*;
        let is = RuleExpr::is;
        let rules = vec![
            Rule::new(
                "negative trend with high proximity or critical severity",
                RuleExpr::and([
                    is(PitchTrend, "Negativo"),
                    RuleExpr::or([is(Proximity, "Alta"), is(Severity, "Crítico")]),
                ]),
                "Alto",
            ),
            Rule::new(
                "negative trend with sharp acceleration",
                RuleExpr::and([is(PitchTrend, "Negativo"), is(Acceleration, "Acentuada")]),
                "Alto",
            ),
            Rule::new(
                "slow low approach or positive trend",
                RuleExpr::or([
                    RuleExpr::and([
                        is(PitchTrend, "Neutro"),
                        is(Proximity, "Baixa"),
                        is(Altitude, "Baixa"),
                    ]),
                    is(PitchTrend, "Positivo"),
                ]),
                "Baixo",
            ),
            Rule::new(
                "level or climbing without critical severity",
                RuleExpr::and([
                    RuleExpr::or([is(PitchTrend, "Neutro"), is(PitchTrend, "Positivo")]),
                    RuleExpr::not(is(Severity, "Crítico")),
                ]),
                "Baixo",
            ),
            Rule::new(
                "level attitude at terminal speed with critical severity",
                RuleExpr::and([
                    is(PitchTrend, "Neutro"),
                    is(Proximity, "Alta"),
                    is(Severity, "Crítico"),
                ]),
                "Alto",
            ),
        ];

        Self::new(
            InputVariables {
                severity,
                pitch_trend,
                proximity,
                acceleration,
                altitude,
            },
            risk,
            rules,
        )
    }

    pub fn inputs(&self) -> &InputVariables {
        &self.inputs
    }

    pub fn input(&self, var: InputVar) -> &LinguisticVariable {
        self.inputs.get(var)
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn consequent_indices(&self) -> &[usize] {
        &self.consequents
    }
}
