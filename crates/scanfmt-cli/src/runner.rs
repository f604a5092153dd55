use rayon::prelude::*;
use scanfmt::{MatchError, MatchResult, Matcher};
use std::io::{self, BufRead};

pub struct LineOutcome {
    pub line: String,
    pub result: Result<MatchResult, MatchError>,
}

/// Reads every non-blank line, dropping line terminators.
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Matches each line independently. Outcomes keep the order of `lines`.
pub fn match_lines(matcher: &Matcher, lines: &[String]) -> Vec<LineOutcome> {
    lines
        .par_iter()
        .map(|line| LineOutcome {
            line: line.clone(),
            result: matcher.match_line(line),
        })
        .collect()
}
