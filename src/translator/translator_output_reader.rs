use super::{Translation, VarMap};
use crate::{
    formula::LocalVar,
    sat::{Literal, Variable},
};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::BTreeSet, io::BufRead};

lazy_static! {
    static ref MAPPING_LINE_PATTERN: Regex =
        Regex::new(r"^c\s+(?:.*\s)?i(\d+)\s+(\d+)\s*$").unwrap();
}

/// Reads the output of a formula translator.
///
/// The expected content begins with comment lines, some of them mapping local variables to CNF variables
/// (`c ... i<local-id> <cnf-id>`), followed by a DIMACS body:
/// a `p cnf <n_vars> <n_clauses>` header and clauses made of signed integers ending by `0`.
/// Empty lines are ignored.
///
/// Any deviation from this format is an error, including a number of clauses
/// different from the one declared in the header, and two local variables mapped to the same CNF variable.
pub fn read_translator_output(reader: &mut dyn BufRead) -> Result<Translation> {
    let mut var_map = VarMap::default();
    let mut mapped_globals = BTreeSet::new();
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let context = || format!("while reading line {} of the translator output", i + 1);
        let line = line.with_context(context)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('c') {
            if let Some(captures) = MAPPING_LINE_PATTERN.captures(trimmed) {
                let local = read_positive(&captures[1]).with_context(context)?;
                let global = read_positive(&captures[2]).with_context(context)?;
                if var_map
                    .insert(LocalVar::from(local), Variable::from(global))
                    .is_some()
                {
                    return Err(anyhow!("local variable {} is mapped twice", local))
                        .with_context(context);
                }
                if !mapped_globals.insert(global) {
                    return Err(anyhow!("variable {} is the image of several local variables", global))
                        .with_context(context);
                }
            }
            continue;
        }
        if trimmed.starts_with('p') {
            if header.is_some() {
                return Err(anyhow!("multiple preambles")).with_context(context);
            }
            header = Some(read_header(trimmed).with_context(context)?);
            continue;
        }
        let n_vars = match header {
            Some((n_vars, _)) => n_vars,
            None => return Err(anyhow!("clause before the preamble")).with_context(context),
        };
        clauses.push(read_clause(trimmed, n_vars).with_context(context)?);
    }
    let (n_vars, n_clauses) = header.ok_or_else(|| anyhow!("missing preamble in translator output"))?;
    if n_clauses != clauses.len() {
        return Err(anyhow!(
            "the translator declared {} clauses but {} were read",
            n_clauses,
            clauses.len()
        ));
    }
    if let Some((local, global)) = var_map.iter().find(|(_, v)| usize::from(*v) > n_vars) {
        return Err(anyhow!(
            "local variable {} is mapped to {}, which exceeds the {} declared variables",
            local,
            global,
            n_vars
        ));
    }
    Ok(Translation::new(var_map, n_vars, clauses))
}

fn read_positive(word: &str) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(0) | Err(_) => Err(anyhow!(r#""{}" is not a positive integer"#, word)),
        Ok(n) => Ok(n),
    }
}

fn read_header(line: &str) -> Result<(usize, usize)> {
    let words = line.split_ascii_whitespace().collect::<Vec<&str>>();
    if words.len() != 4 || words[0] != "p" || words[1] != "cnf" {
        return Err(anyhow!(r#"invalid preamble "{}""#, line));
    }
    let n_vars = words[2]
        .parse::<usize>()
        .with_context(|| format!(r#"invalid number of variables "{}""#, words[2]))?;
    let n_clauses = words[3]
        .parse::<usize>()
        .with_context(|| format!(r#"invalid number of clauses "{}""#, words[3]))?;
    Ok((n_vars, n_clauses))
}

fn read_clause(line: &str, n_vars: usize) -> Result<Vec<Literal>> {
    let ints = line
        .split_ascii_whitespace()
        .map(|w| {
            w.parse::<isize>()
                .map_err(|_| anyhow!(r#""{}" is not a literal"#, w))
        })
        .collect::<Result<Vec<isize>>>()?;
    match ints.split_last() {
        Some((0, lits)) => lits
            .iter()
            .map(|l| {
                if *l == 0 {
                    Err(anyhow!("unexpected 0 inside a clause"))
                } else if l.unsigned_abs() > n_vars {
                    Err(anyhow!(
                        "literal {} is out of the {} declared variables",
                        l,
                        n_vars
                    ))
                } else {
                    Ok(Literal::from(*l))
                }
            })
            .collect(),
        _ => Err(anyhow!("clause does not end with 0")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    fn read(content: &str) -> Result<Translation> {
        read_translator_output(&mut content.as_bytes())
    }

    #[test]
    fn test_read_ok() {
        let content = "c bool2cnf output\nc x i1 1\nc x i3 2\np cnf 3 2\n1 -3 0\n\n2 3 0\n";
        let translation = read(content).unwrap();
        assert_eq!(3, translation.n_vars());
        assert_eq!(&[clause![1, -3], clause![2, 3]], translation.clauses());
        assert_eq!(2, translation.var_map().len());
        assert_eq!(
            Some(Variable::from(2)),
            translation.var_map().get(LocalVar::from(3))
        );
        assert_eq!(None, translation.var_map().get(LocalVar::from(2)));
    }

    #[test]
    fn test_empty_clause() {
        let translation = read("p cnf 0 1\n0\n").unwrap();
        assert_eq!(&[clause![]], translation.clauses());
    }

    #[test]
    fn test_clause_count_mismatch() {
        let err = read("p cnf 2 3\n1 2 0\n-1 0\n").unwrap_err();
        assert_eq!(
            "the translator declared 3 clauses but 2 were read",
            err.to_string()
        );
        assert!(read("p cnf 2 1\n1 2 0\n-1 0\n").is_err());
    }

    #[test]
    fn test_missing_preamble() {
        assert!(read("c x i1 1\n").is_err());
        assert!(read("1 2 0\np cnf 2 1\n").is_err());
    }

    #[test]
    fn test_invalid_preamble() {
        assert!(read("p dnf 2 1\n1 2 0\n").is_err());
        assert!(read("p cnf 2\n1 2 0\n").is_err());
        assert!(read("p cnf two 1\n1 2 0\n").is_err());
        assert!(read("p cnf 2 1\np cnf 2 1\n1 2 0\n").is_err());
    }

    #[test]
    fn test_invalid_clauses() {
        assert!(read("p cnf 2 1\n1 2\n").is_err());
        assert!(read("p cnf 2 1\n1 0 2 0\n").is_err());
        assert!(read("p cnf 2 1\n1 foo 0\n").is_err());
        assert!(read("p cnf 2 1\n1 3 0\n").is_err());
    }

    #[test]
    fn test_invalid_mapping() {
        assert!(read("c x i1 1\nc x i1 2\np cnf 2 0\n").is_err());
        assert!(read("c x i1 3\np cnf 2 0\n").is_err());
        assert!(read("c x i0 1\np cnf 2 0\n").is_err());
        let err = read("c x i1 1\nc x i2 1\np cnf 1 0\n").unwrap_err();
        assert_eq!(
            "variable 1 is the image of several local variables",
            err.root_cause().to_string()
        );
    }
}
