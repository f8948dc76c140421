use super::{read_translator_output, FormulaTranslator, Translation};
use crate::formula::Formula;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::{
    io::{BufReader, Write},
    process::{Command, Stdio},
};

/// A formula translator which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The formula is written on the standard input of the program, one top-level term per line
/// (see [`Formula::to_translator_input`]).
/// The program must write on its standard output the variable mapping and the CNF,
/// in the format described by [`read_translator_output`].
pub struct ExternalTranslator {
    program: String,
    options: Vec<String>,
}

impl ExternalTranslator {
    /// Builds a new external translator.
    ///
    /// The `program` argument is the path from a directory in execution path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self { program, options }
    }
}

impl FormulaTranslator for ExternalTranslator {
    fn translate(&mut self, formula: &Formula) -> Result<Translation> {
        let input = formula.to_translator_input();
        info!(
            "sending a formula of {} bytes to translator {}",
            input.len(),
            self.program
        );
        let mut child = Command::new(&self.program)
            .args(&self.options)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!(r#"while spawning translator "{}""#, self.program))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("cannot open the translator standard input"))?;
        let writer = std::thread::spawn(move || {
            if let Err(e) = stdin.write_all(input.as_bytes()).and_then(|_| stdin.flush()) {
                debug!("translator input was not fully consumed: {}", e);
            }
        });
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("cannot open the translator standard output"))?;
        let translation = read_translator_output(&mut BufReader::new(stdout))
            .with_context(|| format!(r#"while reading the output of translator "{}""#, self.program));
        let status = child.wait().context("while waiting for the translator")?;
        if writer.join().is_err() {
            return Err(anyhow!("the thread feeding the translator panicked"));
        }
        if !status.success() {
            return Err(anyhow!(
                r#"translator "{}" exited with status {}"#,
                self.program,
                status
            ));
        }
        let translation = translation?;
        info!(
            "translator produced {} variables and {} clauses",
            translation.n_vars(),
            translation.clauses().len()
        );
        Ok(translation)
    }
}
