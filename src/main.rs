#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # aigrade
//!
//! Grade a student's notebook or script against an assignment brief using
//! OpenAI or Gemini.
//!
//! Put `OPENAI_API_KEY` and/or `GEMINI_API_KEY` in the environment or in a
//! `.env` file next to where you run the command, then:
//!
//! ```text
//! aigrade --assignment assignment.txt --notebook solution.ipynb
//! aigrade --provider gemini --pyfile solution.py --out results.txt
//! aigrade check --provider gemini
//! ```

use std::{path::PathBuf, process::ExitCode};

use aigrade::{
    Credentials, GradeError, Grader, Provider, ProviderKind, ProviderSettings, RunConfig,
    SubmissionSource,
    config::{DEFAULT_GEMINI_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_OPENAI_MODEL, DEFAULT_TEMPERATURE},
    error::USAGE_EXIT_CODE,
    pipeline::{DEFAULT_ASSIGNMENT, DEFAULT_OUTPUT},
    prompt::CHECK_PROMPT,
    run,
};
use anyhow::Result;
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Arguments for a grading run.
#[derive(Debug, Clone)]
struct GradeArgs {
    /// Provider and request tuning.
    settings:   ProviderSettings,
    /// Assignment requirements file.
    assignment: PathBuf,
    /// Notebook submission.
    notebook:   Option<PathBuf>,
    /// Script submission.
    pyfile:     Option<PathBuf>,
    /// Results file.
    out:        PathBuf,
    /// Detailed report destination.
    report:     Option<PathBuf>,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a submission
    Grade(GradeArgs),
    /// Check that the selected provider's key works
    Check(ProviderSettings),
}

/// Builds the command line parser
fn options() -> OptionParser<Cmd> {
    /// parses the provider and its tuning flags
    fn settings() -> impl Parser<ProviderSettings> {
        let kind = long("provider")
            .help("Which provider to use: openai or gemini")
            .argument::<ProviderKind>("PROVIDER")
            .fallback(ProviderKind::OpenAi)
            .display_fallback();
        let openai_model = long("openai-model")
            .help("OpenAI model to use")
            .argument::<String>("MODEL")
            .fallback(DEFAULT_OPENAI_MODEL.to_string())
            .display_fallback();
        let gemini_model = long("gemini-model")
            .help("Gemini model to use")
            .argument::<String>("MODEL")
            .fallback(DEFAULT_GEMINI_MODEL.to_string())
            .display_fallback();
        let temperature = long("temperature")
            .help("Sampling temperature")
            .argument::<f32>("TEMP")
            .fallback(DEFAULT_TEMPERATURE)
            .display_fallback();
        let max_tokens = long("max-tokens")
            .help("Maximum number of tokens in the reply")
            .argument::<u32>("N")
            .fallback(DEFAULT_MAX_TOKENS)
            .display_fallback();

        construct!(kind, openai_model, gemini_model, temperature, max_tokens).map(
            |(kind, openai_model, gemini_model, temperature, max_tokens)| {
                ProviderSettings::builder()
                    .kind(kind)
                    .openai_model(openai_model)
                    .gemini_model(gemini_model)
                    .temperature(temperature)
                    .max_tokens(max_tokens)
                    .build()
            },
        )
    }

    /// parses a path flag
    fn path(name: &'static str, help: &'static str) -> impl Parser<PathBuf> {
        long(name).help(help).argument::<PathBuf>("PATH")
    }

    let grade = {
        let settings = settings();
        let assignment = path("assignment", "Path to assignment description")
            .fallback(PathBuf::from(DEFAULT_ASSIGNMENT))
            .debug_fallback();
        let notebook = path("notebook", "Path to student's Jupyter notebook").optional();
        let pyfile = path("pyfile", "Path to student's Python file").optional();
        let out = path("out", "File the results are appended to")
            .fallback(PathBuf::from(DEFAULT_OUTPUT))
            .debug_fallback();
        let report = path("report", "Also write a detailed report to this file").optional();

        construct!(GradeArgs {
            settings,
            assignment,
            notebook,
            pyfile,
            out,
            report
        })
        .map(Cmd::Grade)
    };

    let check = construct!(Cmd::Check(settings()))
        .to_options()
        .command("check")
        .help("Send a short probe to check that the provider's API key works");

    let cmd = construct!([check, grade]);

    cmd.to_options()
        .descr("AI assignment grader (OpenAI/Gemini)")
        .version(env!("CARGO_PKG_VERSION"))
}

/// Exit code for a command line bpaf did not turn into a `Cmd`. Help, version
/// and completion output are successful runs; rejected flags are usage errors.
fn parse_failure_code(failure: &ParseFailure) -> u8 {
    match failure {
        ParseFailure::Stderr(_) => USAGE_EXIT_CODE,
        _ => 0,
    }
}

/// Runs the parsed command.
async fn execute(cmd: Cmd, credentials: &Credentials) -> Result<()> {
    match cmd {
        Cmd::Grade(args) => {
            let submission = SubmissionSource::from_flags(args.notebook, args.pyfile)?;
            let grader = Grader::from_settings(&args.settings, credentials)?;
            let config = RunConfig::builder()
                .assignment(args.assignment)
                .submission(submission)
                .output(args.out)
                .maybe_report(args.report)
                .build();

            let summary = run(&config, &grader).await?;

            println!("{}", "-".repeat(40));
            println!("{}", "GRADING RESULTS:".bold());
            println!("{}", "-".repeat(40));
            println!("{}", summary.record.response());
            eprintln!(
                "\n{} Results saved to {}",
                "Grading complete!".green().bold(),
                config.output().display()
            );
        }
        Cmd::Check(settings) => {
            let grader = Grader::from_settings(&settings, credentials)?;
            let reply = grader.generate(CHECK_PROMPT).await?;
            println!("{}", reply.trim());
            eprintln!(
                "{} {} ({}) accepted the API key",
                "OK:".green().bold(),
                grader.kind(),
                grader.model()
            );
        }
    };

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = match options().run_inner(Args::current_args()) {
        Ok(cmd) => cmd,
        Err(failure) => {
            failure.print_mesage(100);
            return ExitCode::from(parse_failure_code(&failure));
        }
    };
    let credentials = Credentials::from_env();

    match execute(cmd, &credentials).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            let code = e.downcast_ref::<GradeError>().map_or(1, GradeError::exit_code);
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exit code bpaf's outcome maps to for `args`.
    fn exit_code_for(args: &[&str]) -> u8 {
        match options().run_inner(args) {
            Ok(_) => 0,
            Err(failure) => parse_failure_code(&failure),
        }
    }

    #[test]
    fn rejected_flag_values_exit_with_usage_code() {
        assert_eq!(exit_code_for(&["--provider", "anthropic", "--pyfile", "a.py"]), 2);
        assert_eq!(exit_code_for(&["--max-tokens", "abc", "--pyfile", "a.py"]), 2);
        assert_eq!(exit_code_for(&["--temperature", "x", "--pyfile", "a.py"]), 2);
        assert_eq!(exit_code_for(&["check", "--provider", "anthropic"]), 2);
        assert_eq!(exit_code_for(&["--no-such-flag"]), 2);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        assert_eq!(exit_code_for(&["--help"]), 0);
        assert_eq!(exit_code_for(&["--version"]), 0);
        assert_eq!(exit_code_for(&["check", "--help"]), 0);
    }

    #[test]
    fn grade_flags_parse_into_settings() {
        let args = ["--provider", "gemini", "--max-tokens", "300", "--notebook", "s.ipynb"];
        let cmd = options().run_inner(&args[..]).expect("valid command line");
        let Cmd::Grade(args) = cmd else {
            panic!("expected a grade command");
        };
        assert_eq!(args.settings.kind(), ProviderKind::Gemini);
        assert_eq!(args.settings.max_tokens(), 300);
        assert_eq!(args.notebook, Some(PathBuf::from("s.ipynb")));
        assert_eq!(args.out, PathBuf::from(DEFAULT_OUTPUT));
    }
}
