use crate::config::Config;
use crate::error::PrefixerError;
use crate::options::{LocationSink, Mode, TransformOptions};
use crate::range::RangeSet;
use crate::template::decode_nul_escapes;
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "

License: MIT
Rust Edition: 2024"
);

#[derive(Parser)]
#[command(name = "prefixer")]
#[command(about = "Manipulate records stored in a text stream")]
#[command(long_about = "prefixer reads stdin, splits it into records, transforms each record,
and writes the surviving records to stdout joined by the output separator.

Records are split on --input-sep and joined with --output-sep. Both default
to a newline.

ESCAPES:
  The string '\\x00' is converted to a NUL character in --add-prefix,
  --add-postfix, --remove-prefix, --input-sep and --output-sep.
  Use --rm-x, --from-x and --to-x to enable the same conversion for rm
  records and replace pairs. There is no other escape mechanism.

LINE NUMBERS:
  With --location, the magic string 'PREFIXER_LINENUMBER' in --add-prefix,
  --add-postfix and the replace fallback template is replaced with the line
  on which the record starts in the input.

RANGES:
  --process-include takes a comma-separated list of 1-based ranges:
  N, A..B, N.., ..N and .. . Negative numbers count from the end (-1 is
  the last record). Records outside the ranges are passed through unchanged.

EXAMPLES:
  prefixer -a '> '                          Quote every line
  prefixer -t -s -i ',' -o '\\n'             Turn a comma list into lines
  prefixer -s rm -- foo bar                 Drop records 'foo' and 'bar'
  prefixer replace --replace '[$1]' -- a A  Map 'a' to 'A', bracket the rest
  prefixer -l /dev/null -a 'PREFIXER_LINENUMBER: '  Number the records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = LONG_VERSION)]
#[command(propagate_version = true)]
struct Cli {
    /// Adds this prefix to the beginning of each record
    #[arg(short = 'a', long = "add-prefix", value_name = "PREFIX", global = true)]
    add_prefix: Option<String>,

    /// Adds this to the end of each record
    #[arg(short = 'p', long = "add-postfix", value_name = "POSTFIX", global = true)]
    add_postfix: Option<String>,

    /// Removes this prefix from the beginning of each record
    #[arg(short = 'r', long = "remove-prefix", value_name = "PREFIX", global = true)]
    remove_prefix: Option<String>,

    /// Skip empty records (after --remove-prefix, and after replacement)
    #[arg(short = 's', long = "skip-empty", global = true)]
    skip_empty: bool,

    /// Input record separator
    #[arg(short = 'i', long = "input-sep", value_name = "SEP", global = true)]
    input_sep: Option<String>,

    /// Output record separator
    #[arg(short = 'o', long = "output-sep", value_name = "SEP", global = true)]
    output_sep: Option<String>,

    /// Trims whitespace around each record before other transformations
    #[arg(short = 't', long, global = true)]
    trim: bool,

    /// Strip ANSI color codes from records when testing equality in rm or replace
    #[arg(long = "rm-ansi", global = true)]
    rm_ansi: bool,

    /// Only process records selected by this nth-expression (e.g. '2..,-1')
    #[arg(long = "process-include", value_name = "RANGES", global = true)]
    #[arg(allow_hyphen_values = true)]
    process_include: Option<String>,

    /// Track the starting line number of each record and write them to FILE
    /// (use /dev/null to only enable tracking)
    #[arg(short = 'l', long, value_name = "FILE", global = true)]
    location: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove the given records from the output
    #[command(long_about = "Skip the records supplied, i.e. remove them from the output.

This happens after trimming and prefix removal. Put '--' before the records
so values starting with '-' are not read as options.

EXAMPLES:
  prefixer rm -- foo              Drop every 'foo' record
  prefixer -t rm -- '' '#'        Drop blank records and lone '#'")]
    Rm {
        /// Enable \x00 to NUL conversion for RECORD
        #[arg(long = "rm-x")]
        rm_x: bool,

        #[arg(value_name = "RECORD")]
        records: Vec<String>,
    },

    /// Replace records found in a table of FROM TO pairs
    #[command(long_about = "Replace each record equal to a FROM value with its TO value.

Records that match no FROM value are replaced with the --replace template
when one is given. In the template, '$1' stands for the whole record.

EXAMPLES:
  prefixer replace -- yes y no n           Shorten answers
  prefixer replace --replace '\"$1\"' -- '' null  Quote records, map empty to null")]
    Replace {
        /// Enable \x00 to NUL conversion for FROM
        #[arg(long = "from-x")]
        from_x: bool,

        /// Enable \x00 to NUL conversion for TO and the --replace template
        #[arg(long = "to-x")]
        to_x: bool,

        /// Template for records not found in the table ($1 is the record)
        #[arg(short = 'R', long = "replace", value_name = "TEMPLATE")]
        fallback: Option<String>,

        #[arg(value_name = "FROM TO")]
        pairs: Vec<String>,
    },
}

/// Parsed command line, before config defaults are merged in
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    pub add_prefix: Option<String>,
    pub add_postfix: Option<String>,
    pub remove_prefix: Option<String>,
    pub skip_empty: bool,
    pub input_sep: Option<String>,
    pub output_sep: Option<String>,
    pub trim: bool,
    pub rm_ansi: bool,
    pub process_include: Option<String>,
    pub location: Option<PathBuf>,
    pub mode: ModeArgs,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModeArgs {
    #[default]
    Plain,
    Rm {
        records: Vec<String>,
        rm_x: bool,
    },
    Replace {
        pairs: Vec<(String, String)>,
        fallback: Option<String>,
        from_x: bool,
        to_x: bool,
    },
}

pub fn parse_args() -> Result<Args> {
    args_from_cli(Cli::parse())
}

/// Parse from an explicit argument list (the first item is the program name)
pub fn parse_args_from<I, T>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    args_from_cli(Cli::try_parse_from(args)?)
}

fn args_from_cli(cli: Cli) -> Result<Args> {
    let mode = match cli.command {
        None => ModeArgs::Plain,
        Some(Commands::Rm { rm_x, records }) => ModeArgs::Rm { records, rm_x },
        Some(Commands::Replace {
            from_x,
            to_x,
            fallback,
            pairs,
        }) => {
            if pairs.len() % 2 != 0 {
                bail!(
                    "replace expects FROM TO pairs, got {} values. Usage: prefixer replace -- from1 to1 from2 to2",
                    pairs.len()
                );
            }
            let pairs = pairs
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect();
            ModeArgs::Replace {
                pairs,
                fallback,
                from_x,
                to_x,
            }
        }
    };

    Ok(Args {
        add_prefix: cli.add_prefix,
        add_postfix: cli.add_postfix,
        remove_prefix: cli.remove_prefix,
        skip_empty: cli.skip_empty,
        input_sep: cli.input_sep,
        output_sep: cli.output_sep,
        trim: cli.trim,
        rm_ansi: cli.rm_ansi,
        process_include: cli.process_include,
        location: cli.location,
        mode,
    })
}

/// Apply `\x00` decoding only when `enabled`
fn decode_if(enabled: bool, s: String) -> String {
    if enabled { decode_nul_escapes(&s) } else { s }
}

impl Args {
    /// Merge config defaults and build the options for a run.
    ///
    /// Fails only on an invalid --process-include expression.
    pub fn into_options(self, config: &Config) -> Result<TransformOptions, PrefixerError> {
        let defaults = &config.defaults;

        let process_include = match &self.process_include {
            Some(expr) => RangeSet::parse(expr)?,
            None => RangeSet::unrestricted(),
        };

        let input_separator = self
            .input_sep
            .or_else(|| defaults.input_sep.clone())
            .unwrap_or_else(|| "\n".to_string());
        let output_separator = self
            .output_sep
            .or_else(|| defaults.output_sep.clone())
            .unwrap_or_else(|| "\n".to_string());

        let mode = match self.mode {
            ModeArgs::Plain => Mode::Plain,
            ModeArgs::Rm { records, rm_x } => Mode::Remove {
                records: records
                    .into_iter()
                    .map(|r| decode_if(rm_x, r))
                    .collect::<HashSet<_>>(),
            },
            ModeArgs::Replace {
                pairs,
                fallback,
                from_x,
                to_x,
            } => Mode::Replace {
                // Later pairs win on duplicate FROM values
                table: pairs
                    .into_iter()
                    .map(|(from, to)| (decode_if(from_x, from), decode_if(to_x, to)))
                    .collect::<HashMap<_, _>>(),
                fallback: fallback.map(|t| decode_if(to_x, t)),
            },
        };

        Ok(TransformOptions {
            trim: self.trim || defaults.trim,
            skip_empty: self.skip_empty || defaults.skip_empty,
            rm_ansi: self.rm_ansi || defaults.rm_ansi,
            add_prefix: decode_nul_escapes(&self.add_prefix.unwrap_or_default()),
            add_postfix: decode_nul_escapes(&self.add_postfix.unwrap_or_default()),
            remove_prefix: decode_nul_escapes(&self.remove_prefix.unwrap_or_default()),
            input_separator: decode_nul_escapes(&input_separator),
            output_separator: decode_nul_escapes(&output_separator),
            process_include,
            mode,
            location: self.location.as_deref().map(LocationSink::from_path),
        })
    }
}
