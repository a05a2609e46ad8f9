//! Conversions between numeric vectors, resolved configurations and
//! `--name value` token sequences.

use serde::{Deserialize, Serialize};
use std::fmt;

use ev_types::ParameterError;

use crate::parameter::Value;
use crate::space::ParameterSpace;

/// Ordered `(name, value)` pairs of the active parameters of a resolved space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Configuration {
    entries: Vec<(String, Value)>,
}

impl Configuration {
    pub fn new(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `["--name", "value", ...]` in flatten order.
    pub fn to_tokens(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(name, value)| [format!("--{name}"), value.to_string()])
            .collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tokens().join(" "))
    }
}

/// Split a configuration string on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Decode `vector` on a fresh instance of `template` and return the
/// resulting configuration. The template itself is left untouched.
pub fn decode_vector_to_configuration(
    template: &ParameterSpace,
    vector: &[f64],
) -> Result<Configuration, ParameterError> {
    let mut instance = template.create_instance();
    instance.decode(vector)?;
    instance.configuration()
}

/// Token form of a configuration, ready for [`ParameterSpace::parse`].
pub fn encode_configuration_to_tokens(configuration: &Configuration) -> Vec<String> {
    configuration.to_tokens()
}

/// Inverse of [`decode_vector_to_configuration`] for the active parameters.
///
/// The returned vector decodes to the same configuration (reals up to
/// floating-point rounding). Its length is the number of active parameters.
pub fn encode_configuration_to_vector(
    template: &ParameterSpace,
    configuration: &Configuration,
) -> Result<Vec<f64>, ParameterError> {
    let mut instance = template.create_instance();
    instance.parse(&configuration.to_tokens())?;
    instance
        .flatten()
        .into_iter()
        .map(|id| {
            let parameter = instance.parameter(id);
            let value = parameter.value().ok_or_else(|| ParameterError::Missing {
                name: parameter.name().to_string(),
            })?;
            parameter.domain().encode(parameter.name(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameter;

    fn space() -> ParameterSpace {
        let mut space = ParameterSpace::new("codec");
        space
            .put(Parameter::categorical("mutation", ["uniform", "polynomial"]))
            .unwrap();
        space
            .put(Parameter::real("mutationProbabilityFactor", 0.0, 2.0))
            .unwrap();
        space
            .put(Parameter::real("polynomialMutationDistributionIndex", 5.0, 400.0))
            .unwrap();
        space
            .put(Parameter::real("uniformMutationPerturbation", 0.0, 1.0))
            .unwrap();
        space
            .put(Parameter::categorical_integer("offspringPopulationSize", [1, 2, 5, 10, 20]))
            .unwrap();
        space.put(Parameter::boolean("normalizeObjectives")).unwrap();
        space
            .add_global_sub_parameter("mutation", "mutationProbabilityFactor")
            .unwrap();
        space
            .add_conditional_sub_parameter("mutation", "polynomial", "polynomialMutationDistributionIndex")
            .unwrap();
        space
            .add_conditional_sub_parameter("mutation", "uniform", "uniformMutationPerturbation")
            .unwrap();
        space.add_top_level_parameter("mutation").unwrap();
        space.add_top_level_parameter("offspringPopulationSize").unwrap();
        space.add_top_level_parameter("normalizeObjectives").unwrap();
        space
    }

    #[test]
    fn vector_and_token_paths_agree() {
        let template = space();
        let vectors: [&[f64]; 4] = [
            &[0.0, 0.0, 0.0, 0.0, 0.0],
            &[1.0, 1.0, 1.0, 1.0, 1.0],
            &[0.3, 0.77, 0.123456789, 0.61, 0.49],
            &[0.51, 0.5, 0.999, 0.21, 0.5],
        ];
        for vector in vectors {
            let mut direct = template.create_instance();
            direct.decode(vector).unwrap();

            let configuration = decode_vector_to_configuration(&template, vector).unwrap();
            let mut reparsed = template.create_instance();
            reparsed
                .parse(&encode_configuration_to_tokens(&configuration))
                .unwrap();

            assert_eq!(direct.configuration().unwrap(), reparsed.configuration().unwrap());
        }
    }

    #[test]
    fn encoded_vector_decodes_to_same_configuration() {
        let template = space();
        let configuration = Configuration::new(vec![
            ("mutation".into(), Value::from("polynomial")),
            ("mutationProbabilityFactor".into(), Value::Real(1.25)),
            ("polynomialMutationDistributionIndex".into(), Value::Real(20.0)),
            ("offspringPopulationSize".into(), Value::Integer(5)),
            ("normalizeObjectives".into(), Value::Boolean(true)),
        ]);
        let vector = encode_configuration_to_vector(&template, &configuration).unwrap();
        assert_eq!(vector.len(), 5);

        let decoded = decode_vector_to_configuration(&template, &vector).unwrap();
        assert_eq!(decoded.get("mutation"), Some(&Value::from("polynomial")));
        assert_eq!(decoded.get("offspringPopulationSize"), Some(&Value::Integer(5)));
        assert_eq!(decoded.get("normalizeObjectives"), Some(&Value::Boolean(true)));
        let factor = decoded.get("mutationProbabilityFactor").and_then(Value::as_f64).unwrap();
        assert!((factor - 1.25).abs() < 1e-12);
        let index = decoded
            .get("polynomialMutationDistributionIndex")
            .and_then(Value::as_f64)
            .unwrap();
        assert!((index - 20.0).abs() < 1e-9);
    }

    #[test]
    fn template_is_not_mutated() {
        let template = space();
        decode_vector_to_configuration(&template, &[0.9, 0.9, 0.9, 0.9, 0.9]).unwrap();
        assert!(template.parameters().all(|p| p.value().is_none()));
    }

    #[test]
    fn configuration_display_and_tokenize() {
        let template = space();
        let configuration = decode_vector_to_configuration(&template, &[0.2, 0.5, 0.5, 0.3, 0.9]).unwrap();
        let text = configuration.to_string();
        assert!(text.starts_with("--mutation uniform --mutationProbabilityFactor 1"));
        assert_eq!(tokenize(&text), configuration.to_tokens());
    }
}
