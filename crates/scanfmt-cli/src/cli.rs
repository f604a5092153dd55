use clap::{ArgAction, Parser};

pub const DEFAULT_FORMAT: &str = "${command:String}: ${args:Int}, name:${n:String}";

#[derive(Parser)]
#[command(
    name = "scanfmt",
    about = "Extract typed values from text using a format with ${name:Kind} placeholders",
    version
)]
pub struct Cli {
    /// Input words, joined with spaces into one line. Reads lines from stdin when omitted.
    /// Words starting with '-' go after `--`
    #[arg(allow_negative_numbers = true)]
    pub input: Vec<String>,

    /// Format to match against, e.g. "${command:String}: ${args:Int}"
    #[arg(short, long, env = "SCANFMT_FORMAT", default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Render each match through a template with {{ name }} tags instead of JSON
    #[arg(short, long)]
    pub template: Option<String>,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Convert captured values to their declared kinds
    #[arg(long)]
    pub coerce: bool,

    /// Reject placeholders that declare an unknown kind
    #[arg(long)]
    pub strict_kinds: bool,

    /// Exit with status 1 if any line scores below this value
    #[arg(long, value_name = "SCORE", value_parser = parse_score)]
    pub min_score: Option<f64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show match diagnostics and raise log verbosity (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The positional input joined into one line, if any was given.
    pub fn input_line(&self) -> Option<String> {
        if self.input.is_empty() {
            None
        } else {
            Some(self.input.join(" "))
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn parse_score(s: &str) -> Result<f64, String> {
    let score: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(format!("{} is not between 0 and 1", score))
    }
}
