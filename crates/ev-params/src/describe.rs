//! Structured and irace descriptions of a parameter space.

use serde::{Deserialize, Serialize};

use crate::parameter::{Domain, ParameterId};
use crate::space::ParameterSpace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub name: String,
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global: Vec<ParameterDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional: Vec<ConditionalDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalDescription {
    pub when: String,
    pub parameter: ParameterDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDescription {
    pub name: String,
    pub dimension: usize,
    pub parameters: Vec<ParameterDescription>,
}

pub fn describe_space(space: &ParameterSpace) -> SpaceDescription {
    SpaceDescription {
        name: space.name().to_string(),
        dimension: space.dimension(),
        parameters: space
            .top_level_parameters()
            .iter()
            .map(|id| describe_parameter(space, *id))
            .collect(),
    }
}

/// Pretty-printed JSON of [`describe_space`], for tools that read the tree
/// instead of an irace file.
pub fn describe_space_json(space: &ParameterSpace) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&describe_space(space))
}

fn describe_parameter(space: &ParameterSpace, id: ParameterId) -> ParameterDescription {
    let parameter = space.parameter(id);
    ParameterDescription {
        name: parameter.name().to_string(),
        domain: parameter.domain().clone(),
        global: parameter
            .global_sub_parameters()
            .iter()
            .map(|child| describe_parameter(space, *child))
            .collect(),
        conditional: parameter
            .conditional_sub_parameters()
            .iter()
            .map(|c| ConditionalDescription {
                when: c.condition.description(),
                parameter: describe_parameter(space, c.parameter),
            })
            .collect(),
    }
}

/// Render the space as an irace parameter file: one line per parameter,
/// `name "--name " type (domain) | condition`, with a `#` line after each
/// top-level tree.
pub fn irace_parameter_file(space: &ParameterSpace) -> String {
    let mut out = String::new();
    for id in space.top_level_parameters() {
        irace_lines(space, *id, None, &mut out);
        out.push_str("#\n");
    }
    out
}

fn irace_lines(space: &ParameterSpace, id: ParameterId, condition: Option<String>, out: &mut String) {
    let parameter = space.parameter(id);
    let (kind, values) = irace_domain(parameter.domain());
    let flag = format!("\"--{} \"", parameter.name());
    let condition = condition.unwrap_or_default();
    let line = format!(
        "{:<40} {:<40} {:<7} {:<30} {:<20}",
        parameter.name(),
        flag,
        kind,
        values,
        condition
    );
    out.push_str(line.trim_end());
    out.push('\n');

    let global_condition = match parameter.domain() {
        Domain::Categorical { .. } | Domain::CategoricalInteger { .. } | Domain::Boolean => {
            let (_, all) = irace_domain(parameter.domain());
            let quoted: Vec<String> = all
                .trim_matches(|c| c == '(' || c == ')')
                .split(", ")
                .map(|v| format!("\"{v}\""))
                .collect();
            Some(format!("| {} %in% c({})", parameter.name(), quoted.join(",")))
        }
        _ => None,
    };
    for child in parameter.global_sub_parameters() {
        irace_lines(space, *child, global_condition.clone(), out);
    }
    for c in parameter.conditional_sub_parameters() {
        let when = format!("| {} %in% c(\"{}\")", parameter.name(), c.condition.description());
        irace_lines(space, c.parameter, Some(when), out);
    }
}

fn irace_domain(domain: &Domain) -> (&'static str, String) {
    match domain {
        Domain::Categorical { labels } => ("c", format!("({})", labels.join(", "))),
        Domain::CategoricalInteger { values } => {
            let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            ("c", format!("({})", values.join(", ")))
        }
        Domain::Integer { min, max } => ("i", format!("({min}, {max})")),
        Domain::Real { min, max } => ("r", format!("({min}, {max})")),
        Domain::Boolean => ("c", "(true, false)".to_string()),
        Domain::Text => ("c", "()".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::nsgaii_space;
    use crate::names::*;

    #[test]
    fn description_mirrors_tree() {
        let space = nsgaii_space().unwrap();
        let description = describe_space(&space);
        assert_eq!(description.parameters.len(), 5);
        assert_eq!(description.dimension, space.dimension());

        let variation = &description.parameters[3];
        assert_eq!(variation.name, VARIATION);
        assert_eq!(variation.global[0].name, MUTATION);
        assert_eq!(variation.conditional[0].when, CROSSOVER_AND_MUTATION_VARIATION);

        let json = serde_json::to_string(&description).unwrap();
        let back: SpaceDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, description);
    }

    #[test]
    fn json_description_nests_conditionals_under_their_parent() {
        let space = nsgaii_space().unwrap();
        let json = describe_space_json(&space).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "NSGA-II");
        assert_eq!(value["dimension"], space.dimension());
        let selection = &value["parameters"][4];
        assert_eq!(selection["name"], SELECTION);
        assert_eq!(selection["conditional"][0]["when"], TOURNAMENT);
        assert_eq!(selection["conditional"][0]["parameter"]["name"], SELECTION_TOURNAMENT_SIZE);
        // leaves carry no empty child lists
        assert!(value["parameters"][1].get("global").is_none());
    }

    #[test]
    fn irace_file_lists_every_parameter() {
        let space = nsgaii_space().unwrap();
        let text = irace_parameter_file(&space);
        let parameter_lines = text.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(parameter_lines, space.dimension());
        assert_eq!(text.lines().filter(|l| *l == "#").count(), 5);

        let sbx = text
            .lines()
            .find(|l| l.starts_with(SBX_DISTRIBUTION_INDEX))
            .unwrap();
        assert!(sbx.contains("\"--sbxDistributionIndex \""));
        assert!(sbx.contains(" r "));
        assert!(sbx.contains("(5, 400)"));
        assert!(sbx.ends_with("| crossover %in% c(\"SBX\")"));

        let probability = text
            .lines()
            .find(|l| l.starts_with(CROSSOVER_PROBABILITY))
            .unwrap();
        assert!(probability.ends_with("| crossover %in% c(\"SBX\",\"BLX_ALPHA\",\"wholeArithmetic\")"));
    }
}
