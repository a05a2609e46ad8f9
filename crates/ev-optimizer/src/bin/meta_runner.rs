use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ev_engine::{AlgorithmAssembler, EvolutionaryAssembler, MoeadAssembler, OperatorRegistry, SmsEmoaAssembler};
use ev_operators::problems::{analytic_front, problem_by_name};
use ev_optimizer::{
    write_parameter_space, write_results, EvaluationBudget, EvaluatorConfig, MetaOptimizationEvaluator, MetaOptimizer,
    OptimizationConfig, QualityIndicator, ReferenceFront, TrainingSpec,
};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_number<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value.trim().parse().with_context(|| format!("{name}={value}")),
        Err(_) => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let algorithm = env_or("EVOLVER_ALGORITHM", "nsgaii");
    let problems = env_or("EVOLVER_PROBLEM", "ZDT1");
    let evaluations: usize = env_number("EVOLVER_EVALUATIONS", 5000)?;
    let runs: usize = env_number("EVOLVER_RUNS", 1)?;
    let trials: usize = env_number("EVOLVER_TRIALS", 50)?;
    let population: usize = env_number("EVOLVER_POPULATION", 100)?;
    let strategy = env_or("EVOLVER_STRATEGY", "random");
    let output_dir = PathBuf::from(env_or("EVOLVER_OUTPUT_DIR", "evolver-results"));
    let indicators = env_or("EVOLVER_INDICATORS", "EP,NHV")
        .split(',')
        .map(str::parse::<QualityIndicator>)
        .collect::<Result<Vec<QualityIndicator>, _>>()?;

    let registry = Arc::new(OperatorRegistry::with_defaults());
    let assembler: Arc<dyn AlgorithmAssembler> = match algorithm.to_ascii_lowercase().as_str() {
        "nsgaii" => Arc::new(EvolutionaryAssembler::new(registry)?),
        "moead" => Arc::new(MoeadAssembler::new(registry)?),
        "smsemoa" => Arc::new(SmsEmoaAssembler::new(registry)?),
        other => bail!("Unknown algorithm family: {other}"),
    };

    let reference_files = std::env::var("EVOLVER_REFERENCE_FRONT").ok();
    let reference_files: Vec<&str> = reference_files.as_deref().map(|s| s.split(',').collect()).unwrap_or_default();
    let mut training = Vec::new();
    for (i, name) in problems.split(',').map(str::trim).enumerate() {
        let problem = problem_by_name(name)?;
        let reference = match reference_files.get(i) {
            Some(path) => ReferenceFront::from_file(path.trim())?,
            None => ReferenceFront::new(
                name,
                analytic_front(name, problem.number_of_objectives(), population.max(100))?,
            )?,
        };
        training.push(
            TrainingSpec::new(problem, reference, EvaluationBudget::Fixed(evaluations)).with_independent_runs(runs),
        );
    }

    let mut evaluator_config = EvaluatorConfig::default().with_population_size(population);
    if let Ok(seed) = std::env::var("EVOLVER_SEED") {
        evaluator_config = evaluator_config.with_seed(seed.trim().parse().context("EVOLVER_SEED")?);
    }
    let seed = evaluator_config.seed;
    let evaluator = MetaOptimizationEvaluator::new(assembler, training, indicators, evaluator_config)?;

    let mut config = OptimizationConfig::new(format!("{algorithm}-{problems}"), &algorithm, &strategy)
        .with_max_trials(trials);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut optimizer = MetaOptimizer::new(evaluator, config)?;
    optimizer.run()?;

    let mut paths = write_results(&output_dir, &optimizer.best_trials(), optimizer.trials())?;
    paths.push(write_parameter_space(
        &output_dir,
        optimizer.evaluator().assembler().parameter_space(),
    )?);
    for path in paths {
        info!("Wrote {}", path.display());
    }
    Ok(())
}
