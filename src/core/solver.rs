use super::{Model, SolveStatus, Solution, Variable};
use crate::io::FlatZincWriter;
use anyhow::{anyhow, Context, Result};
use rustc_hash::FxHashMap;
use std::{
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    process::{self, Output},
    time::Duration,
};
use tempfile::Builder;
use tracing::{debug, info};

const TEMP_FILE_PREFIX: &str = "shift_compiler-";

/// An interface for constraint solving backends.
pub trait Solver {
    /// Solves the model, using at most (approximately) the provided amount of time.
    ///
    /// Infeasibility and timeouts are reported through the status of the returned [`Solution`];
    /// an error is only returned when the backend itself failed.
    fn solve(&self, model: &Model, time_budget: Duration) -> Result<Solution>;
}

/// An external FlatZinc solver, built thanks to the path to its executable.
///
/// The model is written in a temporary FlatZinc file which path is given as the last argument of the solver.
/// The solver must print its solutions following the FlatZinc output conventions,
/// and should be asked (through the extra arguments) to print intermediate solutions when optimizing.
pub struct ExternalFlatZincSolver {
    path: PathBuf,
    args: Vec<String>,
    time_limit_flag: Option<String>,
}

impl ExternalFlatZincSolver {
    /// Adds arguments passed to the solver before the model file.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Sets the flag used to give the time budget (in milliseconds) to the solver.
    pub fn with_time_limit_flag(mut self, flag: impl Into<String>) -> Self {
        self.time_limit_flag = Some(flag.into());
        self
    }
}

impl Solver for ExternalFlatZincSolver {
    fn solve(&self, model: &Model, time_budget: Duration) -> Result<Solution> {
        let fzn_writer = FlatZincWriter;
        let fzn_file = Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(".fzn")
            .tempfile()
            .context("while creating a temporary file")?;
        debug!("writing the FlatZinc model into {:?}", fzn_file.path());
        let mut fzn_file_writer = BufWriter::new(fzn_file.as_file());
        fzn_writer
            .write(&mut fzn_file_writer, model)
            .context("while writing the FlatZinc model")?;
        fzn_file_writer
            .flush()
            .context("while writing the FlatZinc model")?;
        std::mem::drop(fzn_file_writer);
        let mut command = process::Command::new(&self.path);
        command.args(&self.args);
        if let Some(flag) = &self.time_limit_flag {
            command.arg(flag).arg(time_budget.as_millis().to_string());
        }
        let command_output = command
            .arg(fzn_file.path())
            .output()
            .context("while invoking the external FlatZinc solver")?;
        let solution = extract_flatzinc_output(&command_output, model)?;
        info!(
            "FlatZinc solver exited with status {} and objective {:?}",
            solution.status(),
            solution.objective()
        );
        fzn_file
            .close()
            .context("while deleting the temporary file")?;
        Ok(solution)
    }
}

fn extract_flatzinc_output(out: &Output, model: &Model) -> Result<Solution> {
    if !out.status.success() {
        return Err(anyhow!("FlatZinc solver ended with an error status"))
            .context("while inspecting the output of the FlatZinc solver");
    }
    let out_reader = BufReader::new(out.stdout.as_slice());
    extract_flatzinc_output_content(out_reader, model)
}

fn extract_flatzinc_output_content<R: BufRead>(mut out_reader: R, model: &Model) -> Result<Solution> {
    let context = "while inspecting the output of the FlatZinc solver";
    let names = FlatZincWriter::output_names(model);
    let mut current: Vec<Option<i64>> = vec![None; model.n_vars()];
    let mut last_solution = None;
    let mut complete = false;
    let mut unsatisfiable = false;
    let mut buffer = String::new();
    loop {
        buffer.clear();
        match out_reader.read_line(&mut buffer) {
            Ok(0) => break,
            Err(e) => return Err(e).context(context),
            Ok(_) => match buffer.trim() {
                "" => continue,
                line if line.starts_with('%') => continue,
                "----------" => {
                    let values = current
                        .iter()
                        .map(|v| v.ok_or(anyhow!("incomplete solution")))
                        .collect::<Result<Vec<i64>>>()
                        .context(context)?;
                    last_solution = Some(values);
                    current.iter_mut().for_each(|v| *v = None);
                }
                "==========" => complete = true,
                "=====UNSATISFIABLE=====" => unsatisfiable = true,
                "=====UNKNOWN=====" | "=====UNBOUNDED=====" => {}
                "=====ERROR=====" => {
                    return Err(anyhow!("the solver reported an error")).context(context)
                }
                line => {
                    let (var, value) = read_assignment(line, &names).context(context)?;
                    current[var - 1] = Some(value);
                }
            },
        }
    }
    Ok(match last_solution {
        Some(values) => {
            let status = if complete || model.objective().is_none() {
                SolveStatus::Optimal
            } else {
                SolveStatus::Feasible
            };
            Solution::new(status, values, model)
        }
        None if unsatisfiable => Solution::without_assignment(SolveStatus::Infeasible),
        None => Solution::without_assignment(SolveStatus::Unknown),
    })
}

fn read_assignment(line: &str, names: &FxHashMap<String, Variable>) -> Result<(Variable, i64)> {
    let (name, value) = line
        .strip_suffix(';')
        .and_then(|l| l.split_once('='))
        .ok_or_else(|| anyhow!(r#"unexpected line: "{}""#, line))?;
    let var = *names
        .get(name.trim())
        .ok_or_else(|| anyhow!(r#"unknown variable "{}""#, name.trim()))?;
    let value = match value.trim() {
        "true" => 1,
        "false" => 0,
        v => str::parse::<i64>(v).with_context(|| format!(r#"while parsing value "{}""#, v))?,
    };
    Ok((var, value))
}

impl From<PathBuf> for ExternalFlatZincSolver {
    fn from(value: PathBuf) -> Self {
        Self {
            path: value,
            args: Vec::new(),
            time_limit_flag: None,
        }
    }
}
