use super::{cli_manager::logging_level_cli_arg, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use lexbibd::{
    designs::{DesignEnumerator, DesignInstance, DesignModelBuilder, Exhaustion},
    utils::PhaseTimes,
};
use log::info;
use std::io::Write;

const CMD_NAME: &str = "enumerate";

const ARG_INSTANCE: &str = "INSTANCE";
const ARG_N_VERTICES: &str = "N_VERTICES";
const ARG_BLOCK_SIZE: &str = "BLOCK_SIZE";
const ARG_COPY: &str = "COPY";
const ARG_LIMIT: &str = "LIMIT";
const ARG_VERBOSE: &str = "VERBOSE";
const ARG_STATS: &str = "STATS";

const CSV_PHASES: [&str; 4] = ["make lex", "translate", "make model", "solving"];

pub(crate) struct EnumerateCommand;

impl EnumerateCommand {
    pub(crate) fn new() -> Self {
        EnumerateCommand
    }
}

impl<'a> Command<'a> for EnumerateCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Enumerates the balanced incomplete block designs of an instance")
            .setting(AppSettings::DisableVersion)
            .arg(
                Arg::with_name(ARG_INSTANCE)
                    .short("i")
                    .long("instance")
                    .empty_values(false)
                    .multiple(false)
                    .help("the design parameters, written n,k,lambda")
                    .required_unless(ARG_N_VERTICES)
                    .conflicts_with_all(&[ARG_N_VERTICES, ARG_BLOCK_SIZE, ARG_COPY]),
            )
            .arg(
                Arg::with_name(ARG_N_VERTICES)
                    .short("n")
                    .empty_values(false)
                    .multiple(false)
                    .requires_all(&[ARG_BLOCK_SIZE, ARG_COPY])
                    .help("the number of vertices"),
            )
            .arg(
                Arg::with_name(ARG_BLOCK_SIZE)
                    .short("k")
                    .empty_values(false)
                    .multiple(false)
                    .requires_all(&[ARG_N_VERTICES, ARG_COPY])
                    .help("the number of vertices in each class"),
            )
            .arg(
                Arg::with_name(ARG_COPY)
                    .long("copy")
                    .empty_values(false)
                    .multiple(false)
                    .requires_all(&[ARG_N_VERTICES, ARG_BLOCK_SIZE])
                    .help("the number of classes containing each pair of vertices (lambda)"),
            )
            .arg(common::option_arg("none"))
            .arg(
                Arg::with_name(ARG_LIMIT)
                    .short("l")
                    .long("limit")
                    .empty_values(false)
                    .multiple(false)
                    .help("the maximal number of designs to enumerate"),
            )
            .arg(
                Arg::with_name(ARG_VERBOSE)
                    .short("v")
                    .long("verbose")
                    .takes_value(false)
                    .help("print the designs"),
            )
            .arg(
                Arg::with_name(ARG_STATS)
                    .short("s")
                    .long("stats")
                    .takes_value(false)
                    .help("print timing statistics"),
            )
            .args(&common::translator_args())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let instance = read_instance(arg_matches)?;
        let symmetry_breaking = common::read_option(arg_matches)?;
        let limit = arg_matches
            .value_of(ARG_LIMIT)
            .map(|l| {
                l.parse::<usize>()
                    .with_context(|| format!(r#"invalid limit "{}""#, l))
            })
            .transpose()?;
        info!(
            "the {} design has {} classes and a replication number of {}",
            instance,
            instance.n_classes(),
            instance.replication()
        );
        let mut translator = common::create_translator(arg_matches)?;
        let mut solver = common::create_sat_solver();
        let mut builder = DesignModelBuilder::new(instance, symmetry_breaking);
        let model = builder.build(solver.as_mut(), translator.as_mut())?;
        let mut enumerator = DesignEnumerator::new(solver, model, limit);
        let verbose = arg_matches.is_present(ARG_VERBOSE);
        let mut out = std::io::stdout();
        let mut write_result = Ok(());
        let summary = enumerator.run(|d| {
            if verbose && write_result.is_ok() {
                write_result = writeln!(out, "{}", d);
            }
        })?;
        write_result.context("while writing the designs")?;
        match summary.exhaustion {
            Exhaustion::AllFound => writeln!(out, "designs: {} (all found)", summary.n_designs)?,
            Exhaustion::LimitReached => {
                writeln!(out, "designs: {} (limit reached)", summary.n_designs)?
            }
        }
        if arg_matches.is_present(ARG_STATS) {
            let mut times = PhaseTimes::default();
            times.merge(builder.phase_times());
            times.add("solving", summary.solving_time);
            write_stats(
                &mut out,
                &times,
                &symmetry_breaking.to_string(),
                summary.n_designs,
                enumerator.solver().n_clauses(),
            )?;
        }
        Ok(())
    }
}

fn read_instance(arg_matches: &ArgMatches<'_>) -> Result<DesignInstance> {
    if let Some(s) = arg_matches.value_of(ARG_INSTANCE) {
        return DesignInstance::try_from(s);
    }
    let read_param = |arg: &str, name: &str| -> Result<usize> {
        let value = arg_matches
            .value_of(arg)
            .ok_or_else(|| anyhow!("missing {}", name))?;
        value
            .parse::<usize>()
            .with_context(|| format!(r#"invalid {} "{}""#, name, value))
    };
    DesignInstance::new(
        read_param(ARG_N_VERTICES, "number of vertices")?,
        read_param(ARG_BLOCK_SIZE, "block size")?,
        read_param(ARG_COPY, "index")?,
    )
}

fn write_stats(
    out: &mut dyn Write,
    times: &PhaseTimes,
    option: &str,
    n_designs: usize,
    n_clauses: usize,
) -> Result<()> {
    let sorted = times.sorted_by_duration();
    let max_len = sorted.iter().map(|(p, _)| p.len()).max().unwrap_or_default();
    for (phase, duration) in sorted {
        eprintln!(
            "{:<width$} : {:8.3}",
            phase,
            duration.as_secs_f64(),
            width = max_len
        );
    }
    let csv_times = CSV_PHASES
        .iter()
        .map(|p| format!("{:.3}", times.get(p).unwrap_or_default().as_secs_f64()))
        .collect::<Vec<String>>();
    writeln!(
        out,
        "{},{},{},{}",
        option,
        csv_times.join(","),
        n_designs,
        n_clauses
    )?;
    Ok(())
}
