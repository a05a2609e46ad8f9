//! The parameter space: registry of named parameters, wiring and the
//! recursive parse / decode / flatten walks.

use std::collections::HashMap;
use std::sync::Arc;

use ev_types::ParameterError;
use tracing::debug;

use crate::codec::Configuration;
use crate::parameter::{Condition, ConditionalSubParameter, Parameter, ParameterId, Value};

/// A named set of parameters with a designated top-level subset.
///
/// Parameters live in an arena addressed by [`ParameterId`]; the name index
/// guarantees uniqueness. A space used as a template is never mutated by
/// evaluation: callers work on [`ParameterSpace::create_instance`].
#[derive(Debug, Clone, Default)]
pub struct ParameterSpace {
    name: String,
    parameters: Vec<Parameter>,
    index: HashMap<String, ParameterId>,
    top_level: Vec<ParameterId>,
}

impl ParameterSpace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a parameter; names are unique within a space.
    pub fn put(&mut self, parameter: Parameter) -> Result<ParameterId, ParameterError> {
        parameter.domain().validate_definition(parameter.name())?;
        if self.index.contains_key(parameter.name()) {
            return Err(ParameterError::Duplicate {
                name: parameter.name().to_string(),
            });
        }
        let id = ParameterId(self.parameters.len());
        self.index.insert(parameter.name().to_string(), id);
        self.parameters.push(parameter);
        Ok(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn id(&self, name: &str) -> Result<ParameterId, ParameterError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ParameterError::Unknown {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Result<&Parameter, ParameterError> {
        Ok(&self.parameters[self.id(name)?.0])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Parameter, ParameterError> {
        let id = self.id(name)?;
        Ok(&mut self.parameters[id.0])
    }

    /// Node by id. Ids are only handed out by this space, so lookup cannot miss.
    pub fn parameter(&self, id: ParameterId) -> &Parameter {
        &self.parameters[id.0]
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn top_level_parameters(&self) -> &[ParameterId] {
        &self.top_level
    }

    pub fn add_top_level_parameter(&mut self, name: &str) -> Result<(), ParameterError> {
        let id = self.id(name)?;
        if self.top_level.contains(&id) {
            return Err(ParameterError::Duplicate {
                name: name.to_string(),
            });
        }
        if let Some(parent) = self.parameters[id.0].parent {
            return Err(ParameterError::AlreadyWired {
                child: name.to_string(),
                parent: self.parameters[parent.0].name().to_string(),
            });
        }
        self.top_level.push(id);
        Ok(())
    }

    /// Attach `child` as always active under `parent`.
    pub fn add_global_sub_parameter(&mut self, parent: &str, child: &str) -> Result<(), ParameterError> {
        let (parent, child) = self.attach(parent, child)?;
        self.parameters[parent.0].global.push(child);
        Ok(())
    }

    /// Attach `child` as active when `parent` takes the value `trigger`.
    pub fn add_conditional_sub_parameter(
        &mut self,
        parent: &str,
        trigger: impl Into<Value>,
        child: &str,
    ) -> Result<(), ParameterError> {
        let parent_id = self.id(parent)?;
        let trigger = self.trigger_for(parent_id, trigger.into())?;
        let (parent, child) = self.attach(parent, child)?;
        self.parameters[parent.0].conditional.push(ConditionalSubParameter {
            condition: Condition::Equals(trigger),
            parameter: child,
        });
        Ok(())
    }

    /// Attach `child` as active when `predicate` holds for the parent's value.
    pub fn add_predicate_sub_parameter<F>(
        &mut self,
        parent: &str,
        description: impl Into<String>,
        predicate: F,
        child: &str,
    ) -> Result<(), ParameterError>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let (parent, child) = self.attach(parent, child)?;
        self.parameters[parent.0].conditional.push(ConditionalSubParameter {
            condition: Condition::Predicate {
                description: description.into(),
                test: Arc::new(predicate),
            },
            parameter: child,
        });
        Ok(())
    }

    /// Attach a fixed, context-supplied value that is never searched.
    pub fn add_non_configurable_sub_parameter(
        &mut self,
        parent: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ParameterError> {
        let key = key.into();
        let parameter = self.get_mut(parent)?;
        if parameter.non_configurable.contains_key(&key) {
            return Err(ParameterError::Duplicate { name: key });
        }
        parameter.non_configurable.insert(key, value.into());
        Ok(())
    }

    /// Insert or overwrite a non-configurable value. Assemblers use this so
    /// a space can be assembled again under a different context.
    pub fn set_non_configurable_sub_parameter(
        &mut self,
        parent: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ParameterError> {
        self.get_mut(parent)?.non_configurable.insert(key.into(), value.into());
        Ok(())
    }

    /// Equality triggers must name a value of the parent's domain. Literal
    /// strings are accepted for numeric and boolean parents.
    fn trigger_for(&self, parent: ParameterId, trigger: Value) -> Result<Value, ParameterError> {
        let parameter = &self.parameters[parent.0];
        let trigger = match trigger {
            Value::Text(literal) if !parameter.domain().contains(&Value::Text(literal.clone())) => parameter
                .domain()
                .parse(parameter.name(), &literal)
                .unwrap_or(Value::Text(literal)),
            other => other,
        };
        if !parameter.domain().contains(&trigger) {
            return Err(ParameterError::InvalidDefinition {
                name: parameter.name().to_string(),
                message: format!(
                    "trigger {trigger} is not in domain {}",
                    parameter.domain()
                ),
            });
        }
        Ok(trigger)
    }

    /// Validate an edge `parent -> child` and record the child's parent.
    fn attach(&mut self, parent: &str, child: &str) -> Result<(ParameterId, ParameterId), ParameterError> {
        let parent_id = self.id(parent)?;
        let child_id = self.id(child)?;
        let cyclic = || ParameterError::CyclicDependency {
            parent: parent.to_string(),
            child: child.to_string(),
        };
        if parent_id == child_id {
            return Err(cyclic());
        }
        if let Some(existing) = self.parameters[child_id.0].parent {
            return Err(ParameterError::AlreadyWired {
                child: child.to_string(),
                parent: self.parameters[existing.0].name().to_string(),
            });
        }
        if self.top_level.contains(&child_id) {
            return Err(ParameterError::AlreadyWired {
                child: child.to_string(),
                parent: "top level".to_string(),
            });
        }
        let mut ancestor = self.parameters[parent_id.0].parent;
        while let Some(id) = ancestor {
            if id == child_id {
                return Err(cyclic());
            }
            ancestor = self.parameters[id.0].parent;
        }
        self.parameters[child_id.0].parent = Some(parent_id);
        Ok((parent_id, child_id))
    }

    /// Active sub-parameters of `id` under its current value.
    pub fn active_sub_parameters(&self, id: ParameterId) -> Vec<ParameterId> {
        self.parameters[id.0].active_sub_parameters()
    }

    /// Resolve every top-level parameter and its active sub-parameters from
    /// `--name value` tokens.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), ParameterError> {
        self.clear_values();
        for id in self.top_level.clone() {
            self.parse_node(id, tokens)?;
        }
        Ok(())
    }

    fn parse_node<S: AsRef<str>>(&mut self, id: ParameterId, tokens: &[S]) -> Result<(), ParameterError> {
        self.parameters[id.0].parse(tokens)?;
        for child in self.parameters[id.0].active_sub_parameters() {
            self.parse_node(child, tokens)?;
        }
        Ok(())
    }

    /// Resolve the space from a vector of `[0, 1]` scalars, consumed in
    /// depth-first flatten order. Returns how many entries were used;
    /// trailing entries are ignored.
    pub fn decode(&mut self, vector: &[f64]) -> Result<usize, ParameterError> {
        self.clear_values();
        let mut cursor = 0;
        for id in self.top_level.clone() {
            self.decode_node(id, vector, &mut cursor)?;
        }
        debug!("Decoded {} of {} vector entries for space {}", cursor, vector.len(), self.name);
        Ok(cursor)
    }

    fn decode_node(&mut self, id: ParameterId, vector: &[f64], cursor: &mut usize) -> Result<(), ParameterError> {
        self.parameters[id.0].decode(vector, cursor)?;
        for child in self.parameters[id.0].active_sub_parameters() {
            self.decode_node(child, vector, cursor)?;
        }
        Ok(())
    }

    /// Depth-first list of the active parameters: each parameter precedes
    /// its active sub-parameters, globals before conditionals.
    pub fn flatten(&self) -> Vec<ParameterId> {
        let mut out = Vec::new();
        for id in &self.top_level {
            self.flatten_node(*id, true, &mut out);
        }
        out
    }

    /// Depth-first list of every reachable parameter, active or not.
    pub fn flatten_all(&self) -> Vec<ParameterId> {
        let mut out = Vec::new();
        for id in &self.top_level {
            self.flatten_node(*id, false, &mut out);
        }
        out
    }

    fn flatten_node(&self, id: ParameterId, active_only: bool, out: &mut Vec<ParameterId>) {
        out.push(id);
        let parameter = &self.parameters[id.0];
        let children = if active_only {
            parameter.active_sub_parameters()
        } else {
            parameter.all_sub_parameters()
        };
        for child in children {
            self.flatten_node(child, active_only, out);
        }
    }

    /// Vector length that decodes any configuration of this space.
    pub fn dimension(&self) -> usize {
        self.flatten_all().len()
    }

    /// The resolved configuration in flatten order.
    pub fn configuration(&self) -> Result<Configuration, ParameterError> {
        let entries = self
            .flatten()
            .into_iter()
            .map(|id| {
                let parameter = &self.parameters[id.0];
                parameter
                    .value()
                    .cloned()
                    .map(|value| (parameter.name().to_string(), value))
                    .ok_or_else(|| ParameterError::Missing {
                        name: parameter.name().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Configuration::new(entries))
    }

    /// An independent copy with the same structure and no resolved values.
    ///
    /// Non-configurable values are kept; assemblers add theirs on the copy.
    pub fn create_instance(&self) -> Self {
        let mut instance = self.clone();
        instance.clear_values();
        instance
    }

    fn clear_values(&mut self) {
        for parameter in &mut self.parameters {
            parameter.clear_value();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// crossover {SBX -> sbxDistributionIndex, BLX_ALPHA -> blxAlpha} with a
    /// global probability, plus an integer top-level parameter.
    fn small_space() -> ParameterSpace {
        let mut space = ParameterSpace::new("small");
        space
            .put(Parameter::categorical("crossover", ["SBX", "BLX_ALPHA"]))
            .unwrap();
        space.put(Parameter::probability("crossoverProbability")).unwrap();
        space
            .put(Parameter::real("sbxDistributionIndex", 5.0, 400.0))
            .unwrap();
        space
            .put(Parameter::real("blxAlphaCrossoverAlphaValue", 0.0, 1.0))
            .unwrap();
        space.put(Parameter::integer("populationSize", 10, 200)).unwrap();

        space
            .add_global_sub_parameter("crossover", "crossoverProbability")
            .unwrap();
        space
            .add_conditional_sub_parameter("crossover", "SBX", "sbxDistributionIndex")
            .unwrap();
        space
            .add_conditional_sub_parameter("crossover", "BLX_ALPHA", "blxAlphaCrossoverAlphaValue")
            .unwrap();
        space.add_top_level_parameter("crossover").unwrap();
        space.add_top_level_parameter("populationSize").unwrap();
        space
    }

    fn names(space: &ParameterSpace, ids: &[ParameterId]) -> Vec<String> {
        ids.iter()
            .map(|id| space.parameter(*id).name().to_string())
            .collect()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut space = small_space();
        let err = space.put(Parameter::boolean("crossover")).unwrap_err();
        assert_eq!(
            err,
            ParameterError::Duplicate {
                name: "crossover".into()
            }
        );
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        let mut space = ParameterSpace::new("bad");
        assert!(matches!(
            space.put(Parameter::integer("n", 5, 5)),
            Err(ParameterError::InvalidDefinition { .. })
        ));
        assert!(matches!(
            space.put(Parameter::categorical("c", Vec::<String>::new())),
            Err(ParameterError::InvalidDefinition { .. })
        ));
        assert!(matches!(
            space.put(Parameter::categorical("d", ["a", "a"])),
            Err(ParameterError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn wiring_rejects_cycles_and_second_parents() {
        let mut space = small_space();
        space.put(Parameter::boolean("flag")).unwrap();

        assert!(matches!(
            space.add_global_sub_parameter("sbxDistributionIndex", "crossover"),
            Err(ParameterError::AlreadyWired { .. })
        ));
        assert!(matches!(
            space.add_global_sub_parameter("flag", "flag"),
            Err(ParameterError::CyclicDependency { .. })
        ));
        assert!(matches!(
            space.add_global_sub_parameter("flag", "crossoverProbability"),
            Err(ParameterError::AlreadyWired { .. })
        ));

        space.put(Parameter::boolean("inner")).unwrap();
        space.add_global_sub_parameter("flag", "inner").unwrap();
        space.put(Parameter::boolean("outer")).unwrap();
        space.add_global_sub_parameter("inner", "outer").unwrap();
        // flag -> inner -> outer; closing the loop must fail
        let err = space.add_global_sub_parameter("outer", "flag").unwrap_err();
        assert!(matches!(err, ParameterError::CyclicDependency { .. }));
        assert!(matches!(
            space.add_global_sub_parameter("missing", "flag"),
            Err(ParameterError::Unknown { .. })
        ));
    }

    #[test]
    fn conditional_trigger_must_belong_to_domain() {
        let mut space = small_space();
        space.put(Parameter::probability("pmx")).unwrap();
        assert!(matches!(
            space.add_conditional_sub_parameter("crossover", "PMX", "pmx"),
            Err(ParameterError::InvalidDefinition { .. })
        ));

        space.put(Parameter::boolean("normalize")).unwrap();
        space.put(Parameter::real("epsilon", 1e-8, 25.0)).unwrap();
        space
            .add_conditional_sub_parameter("normalize", "true", "epsilon")
            .unwrap();
        let condition = &space.get("normalize").unwrap().conditional_sub_parameters()[0].condition;
        assert!(condition.matches(&Value::Boolean(true)));
    }

    #[test]
    fn parse_resolves_active_parameters() {
        let mut space = small_space();
        let tokens = [
            "--crossover",
            "SBX",
            "--crossoverProbability",
            "0.9",
            "--sbxDistributionIndex",
            "20.0",
            "--populationSize",
            "100",
        ];
        space.parse(&tokens).unwrap();

        assert_eq!(
            space.get("crossover").unwrap().value(),
            Some(&Value::from("SBX"))
        );
        assert_eq!(
            space.get("sbxDistributionIndex").unwrap().value(),
            Some(&Value::Real(20.0))
        );
        // inactive, so never read
        assert_eq!(space.get("blxAlphaCrossoverAlphaValue").unwrap().value(), None);
        assert_eq!(
            names(&space, &space.flatten()),
            vec![
                "crossover",
                "crossoverProbability",
                "sbxDistributionIndex",
                "populationSize"
            ]
        );
    }

    #[test]
    fn parse_fails_on_missing_active_parameter() {
        let mut space = small_space();
        let tokens = ["--crossover", "BLX_ALPHA", "--crossoverProbability", "0.9", "--populationSize", "10"];
        let err = space.parse(&tokens).unwrap_err();
        assert_eq!(
            err,
            ParameterError::Missing {
                name: "blxAlphaCrossoverAlphaValue".into()
            }
        );
    }

    #[test]
    fn decode_consumes_active_entries_in_order() {
        let mut space = small_space();
        // crossover=BLX_ALPHA, probability=0.5, alpha=0.25, populationSize=10, tail ignored
        let used = space.decode(&[0.9, 0.5, 0.25, 0.0, 0.7, 0.7]).unwrap();
        assert_eq!(used, 4);
        let configuration = space.configuration().unwrap();
        assert_eq!(
            configuration.to_tokens(),
            vec![
                "--crossover",
                "BLX_ALPHA",
                "--crossoverProbability",
                "0.5",
                "--blxAlphaCrossoverAlphaValue",
                "0.25",
                "--populationSize",
                "10"
            ]
        );
    }

    #[test]
    fn decode_rejects_short_and_out_of_range_vectors() {
        let mut space = small_space();
        assert!(matches!(
            space.decode(&[0.1, 0.5]),
            Err(ParameterError::VectorTooShort { .. })
        ));
        assert!(matches!(
            space.decode(&[0.1, -0.5, 0.5, 0.5]),
            Err(ParameterError::VectorValueOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            space.decode(&[f64::NAN, 0.5, 0.5, 0.5]),
            Err(ParameterError::VectorValueOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn flatten_is_deterministic_and_bounded_by_dimension() {
        let mut space = small_space();
        space.decode(&[0.1, 0.5, 0.5, 0.5]).unwrap();
        let first = space.flatten();
        assert_eq!(first, space.flatten());
        assert!(first.len() <= space.dimension());
        assert_eq!(space.dimension(), 5);
        assert_eq!(
            names(&space, &space.flatten_all()),
            vec![
                "crossover",
                "crossoverProbability",
                "sbxDistributionIndex",
                "blxAlphaCrossoverAlphaValue",
                "populationSize"
            ]
        );
    }

    #[test]
    fn instances_are_isolated() {
        let template = small_space();
        let mut a = template.create_instance();
        let mut b = template.create_instance();
        a.decode(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        b.decode(&[0.9, 0.8, 0.7, 0.6]).unwrap();

        assert_eq!(a.get("crossover").unwrap().value(), Some(&Value::from("SBX")));
        assert_eq!(b.get("crossover").unwrap().value(), Some(&Value::from("BLX_ALPHA")));
        assert_eq!(template.get("crossover").unwrap().value(), None);

        a.add_non_configurable_sub_parameter("crossover", "numberOfProblemVariables", 30usize)
            .unwrap();
        assert!(b
            .get("crossover")
            .unwrap()
            .non_configurable("numberOfProblemVariables")
            .is_none());
    }

    #[test]
    fn non_configurable_keys_are_unique() {
        let mut space = small_space();
        space
            .add_non_configurable_sub_parameter("crossover", "numberOfProblemVariables", 30usize)
            .unwrap();
        assert!(matches!(
            space.add_non_configurable_sub_parameter("crossover", "numberOfProblemVariables", 10usize),
            Err(ParameterError::Duplicate { .. })
        ));

        space
            .set_non_configurable_sub_parameter("crossover", "numberOfProblemVariables", 10usize)
            .unwrap();
        assert_eq!(
            space
                .get("crossover")
                .unwrap()
                .non_configurable("numberOfProblemVariables"),
            Some(&Value::Integer(10))
        );
    }

    #[test]
    fn predicate_conditions_activate_children() {
        let mut space = ParameterSpace::new("predicate");
        space.put(Parameter::integer("size", 1, 100)).unwrap();
        space.put(Parameter::probability("largeOnly")).unwrap();
        space
            .add_predicate_sub_parameter(
                "size",
                "size > 50",
                |v| v.as_i64().map(|n| n > 50).unwrap_or(false),
                "largeOnly",
            )
            .unwrap();
        space.add_top_level_parameter("size").unwrap();

        space.parse(&["--size", "20"]).unwrap();
        assert_eq!(space.flatten().len(), 1);
        space.parse(&["--size", "80", "--largeOnly", "0.3"]).unwrap();
        assert_eq!(space.flatten().len(), 2);
    }
}
