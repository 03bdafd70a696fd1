use super::report::write_report;
use anyhow::{Context, Result};
use clap::Args;
use shift_compiler::{
    compile, CompiledSchedule, CpSolver, ExternalFlatZincSolver, FlatZincWriter,
    InstanceJsonReader, SchedulingInstance, Solver,
};
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Compile a scheduling instance into a FlatZinc model.
#[derive(Args, Debug)]
pub(crate) struct ExportCommand {
    /// the JSON file that contains the scheduling instance
    #[arg(short, long)]
    input: PathBuf,

    /// outputs to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ExportCommand {
    pub(crate) fn execute(&self) -> Result<()> {
        let (_, compiled) = read_and_compile(&self.input)?;
        let fzn_writer = FlatZincWriter;
        let (str_out, unbuffered_out): (String, Box<dyn Write>) = match &self.output {
            None => ("standard output".to_string(), Box::new(io::stdout())),
            Some(path) => {
                let file = File::create(path).context("while creating the output file")?;
                let str_path = fs::canonicalize(path)
                    .with_context(|| format!(r#"while opening file "{}""#, path.display()))?;
                (format!("{:?}", str_path), Box::new(file))
            }
        };
        info!("writing the FlatZinc model to {}", str_out);
        let mut out = BufWriter::new(unbuffered_out);
        fzn_writer.write(&mut out, compiled.model())?;
        out.flush().context("while writing the FlatZinc model")
    }
}

/// Compile a scheduling instance and solve it.
#[derive(Args, Debug)]
pub(crate) struct SolveCommand {
    /// the JSON file that contains the scheduling instance
    #[arg(short, long)]
    input: PathBuf,

    /// the path to an external FlatZinc solver (the built-in CP solver is used if absent)
    #[arg(short, long)]
    solver: Option<PathBuf>,

    /// an argument given to the external solver before the model file
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    solver_args: Vec<String>,

    /// the flag used to give the time limit (in milliseconds) to the external solver
    #[arg(long)]
    time_limit_flag: Option<String>,

    /// the time limit, in seconds
    #[arg(short, long, default_value_t = 60)]
    time_limit: u64,
}

impl SolveCommand {
    pub(crate) fn execute(&self) -> Result<()> {
        let (instance, compiled) = read_and_compile(&self.input)?;
        let solver: Box<dyn Solver> = match &self.solver {
            Some(path) => {
                let path = realpath(path)?;
                info!("using the external FlatZinc solver {:?}", path);
                let mut solver =
                    ExternalFlatZincSolver::from(path).with_args(self.solver_args.clone());
                if let Some(flag) = &self.time_limit_flag {
                    solver = solver.with_time_limit_flag(flag);
                }
                Box::new(solver)
            }
            None => {
                info!("using the built-in CP solver");
                Box::new(CpSolver)
            }
        };
        let start = Instant::now();
        let solution = solver
            .solve(compiled.model(), Duration::from_secs(self.time_limit))
            .context("while solving the scheduling model")?;
        let wall_time = start.elapsed();
        info!("solver ended with status {}", solution.status());
        let mut out = BufWriter::new(io::stdout());
        write_report(&mut out, &instance, &compiled, &solution, wall_time)?;
        out.flush().context("while writing the report")
    }
}

fn read_and_compile(input: &Path) -> Result<(SchedulingInstance, CompiledSchedule)> {
    let input_file_canonicalized = realpath(input)?;
    info!("reading input file {:?}", input_file_canonicalized);
    let reader = BufReader::new(
        File::open(&input_file_canonicalized)
            .with_context(|| format!(r#"while opening file "{}""#, input.display()))?,
    );
    let instance = InstanceJsonReader.read(reader)?;
    debug!(
        "read an instance with {} employees, {} shifts and {} days",
        instance.roster.len(),
        instance.shifts.n_shifts(),
        instance.horizon.num_days()
    );
    let compiled = compile(&instance).context("while compiling the scheduling rules")?;
    Ok((instance, compiled))
}

fn realpath(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!(r#"while opening file "{}""#, path.display()))
}
