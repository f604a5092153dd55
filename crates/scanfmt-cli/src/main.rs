use anyhow::Context;
use clap::Parser;
use scanfmt::Matcher;
use scanfmt_cli::cli::Cli;
use scanfmt_cli::output::{Output, RenderOptions};
use scanfmt_cli::runner::{match_lines, read_lines};
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let lines = match cli.input_line() {
        Some(line) => vec![line],
        None => read_lines(io::stdin().lock()).context("failed to read input from stdin")?,
    };
    if lines.is_empty() {
        log::warn!("no input to match");
        return Ok(());
    }

    let matcher = Matcher::new(cli.format.as_str()).strict_kinds(cli.strict_kinds);
    log::info!(
        "matching {} line(s) against {:?}",
        lines.len(),
        matcher.format()
    );
    let outcomes = match_lines(&matcher, &lines);

    let use_color = !cli.no_color && atty::is(atty::Stream::Stderr);
    let mut output = Output::new(
        use_color,
        RenderOptions {
            template: cli.template.clone(),
            compact: cli.compact,
            coerce: cli.coerce,
        },
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_passed = true;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                output.print_match(&mut out, result)?;
                if cli.verbose > 0 {
                    out.flush()?;
                    output.print_diagnostics(result);
                }
                if let Some(min_score) = cli.min_score {
                    if !result.passes(min_score) {
                        log::info!(
                            "{:?} scored {:.2}, below {:.2}",
                            outcome.line,
                            result.score(),
                            min_score
                        );
                        all_passed = false;
                    }
                }
            }
            Err(e) => {
                output.print_error(&outcome.line, e);
                all_passed = false;
            }
        }
    }
    out.flush()?;

    std::process::exit(if all_passed { 0 } else { 1 });
}
