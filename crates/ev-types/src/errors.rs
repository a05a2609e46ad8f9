use thiserror::Error;

/// Main error type for the Evolver system
#[derive(Error, Debug)]
pub enum EvError {
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Parameter-space errors: structural wiring mistakes and input validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Missing parameter: --{name}")]
    Missing { name: String },

    #[error("Parameter {name}: invalid value {value}. Valid domain: {domain}")]
    InvalidValue {
        name: String,
        value: String,
        domain: String,
    },

    #[error("Parameter {name}: cannot read {value:?} as {expected}")]
    MalformedValue {
        name: String,
        value: String,
        expected: String,
    },

    #[error("Duplicate parameter: {name}")]
    Duplicate { name: String },

    #[error("Unknown parameter: {name}")]
    Unknown { name: String },

    #[error("Cyclic dependency: {child} cannot be placed under {parent}")]
    CyclicDependency { parent: String, child: String },

    #[error("Parameter {child} already has parent {parent}")]
    AlreadyWired { child: String, parent: String },

    #[error("Invalid definition of parameter {name}: {message}")]
    InvalidDefinition { name: String, message: String },

    #[error("Parameter {name} is not configurable from a numeric vector")]
    NotConfigurable { name: String },

    #[error("Vector value {value} at position {index} is outside [0, 1]")]
    VectorValueOutOfRange { index: usize, value: f64 },

    #[error("Vector too short: position {index} requested for {name}, length is {length}")]
    VectorTooShort {
        name: String,
        index: usize,
        length: usize,
    },
}

/// Errors raised while turning a resolved parameter space into an algorithm.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("Unknown {family} operator: {name}")]
    UnknownOperator { family: String, name: String },

    #[error("Missing dependency: {required_by} requires {parameter}")]
    MissingDependency {
        parameter: String,
        required_by: String,
    },

    #[error("Invalid assembly context: {message}")]
    InvalidContext { message: String },
}

/// Errors raised by the meta-optimization evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("The front dimension {front} is not equal to the reference front dimension {reference}")]
    DimensionMismatch { front: usize, reference: usize },

    #[error("Algorithm {algorithm} returned no solutions for problem {problem}")]
    EmptyResult { algorithm: String, problem: String },

    #[error("Inner run failed on {problem}: {message}")]
    RunFailed { problem: String, message: String },

    #[error("Reference front {source_name}: {message}")]
    ReferenceFront {
        source_name: String,
        message: String,
    },

    #[error("Invalid evaluator setup: {message}")]
    InvalidSetup { message: String },
}

/// Result type alias for Evolver operations
pub type EvResult<T> = Result<T, EvError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::EvError::Validation(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::EvError::Internal(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::EvError::Config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParameterError::InvalidValue {
            name: "crossover".to_string(),
            value: "PMX".to_string(),
            domain: "[SBX, blxAlpha]".to_string(),
        };

        assert!(error.to_string().contains("crossover"));
        assert!(error.to_string().contains("PMX"));
        assert!(error.to_string().contains("blxAlpha"));
    }

    #[test]
    fn test_error_conversion() {
        let assembly_error = AssemblyError::UnknownOperator {
            family: "crossover".to_string(),
            name: "PMX".to_string(),
        };
        let ev_error: EvError = assembly_error.into();

        match ev_error {
            EvError::Assembly(_) => (),
            _ => panic!("Expected Assembly error"),
        }
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let error = EvaluationError::DimensionMismatch {
            front: 2,
            reference: 3,
        };
        assert!(error.to_string().contains("dimension 2"));
        assert!(error.to_string().contains("dimension 3"));
    }

    #[test]
    fn test_macros() {
        let _validation_err = validation_error!("Invalid value: {}", 42);
        let _internal_err = internal_error!("Something went wrong");
        let config_err = config_error!("Missing required field: {}", "problem");
        assert!(matches!(config_err, EvError::Config(_)));
    }
}
