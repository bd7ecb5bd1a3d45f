use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

use clap::{CommandFactory, Parser};

use crate::error::ParseError;

const TERMINATOR: &str = "--";

/// Describes the wrapper's own options for --help and --version. The actual
/// scanning is done by [`parse`], since everything after the image must
/// reach the container untouched.
#[derive(Parser, Debug)]
#[command(
    name = "docker-here",
    author,
    version,
    about,
    long_about = None,
    after_help = "Any other option given before IMAGE is passed to `docker run` as is. \
                  Options taking a value must use the --opt=value form."
)]
pub struct Args {
    /// Host directory to mount, the default value is the current directory.
    #[arg(long, value_name = "PATH")]
    pub src: Option<String>,

    /// Mount point and working directory in the container, the default
    /// value is the resolved --src path.
    #[arg(long, value_name = "PATH")]
    pub dest: Option<String>,

    /// Name of image.
    pub image: String,

    /// Command to run in the container, never parsed by docker-here.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn help() -> String {
    Args::command().render_help().to_string()
}

pub fn version() -> String {
    Args::command().render_version()
}

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    Run(ParsedInvocation),
    Help,
    Version,
}

/// Tokens are kept as `OsString` so arguments that are not UTF-8 reach the
/// runtime byte for byte.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// Raw `--src` value.
    pub source: Option<OsString>,
    /// Raw `--dest` value.
    pub dest: Option<OsString>,
    /// Unrecognized options seen before the image, for `docker run`.
    pub forwarded_flags: Vec<OsString>,
    pub image: OsString,
    pub command: Vec<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrapperFlag {
    Src,
    Dest,
}

impl WrapperFlag {
    const ALL: [WrapperFlag; 2] = [WrapperFlag::Src, WrapperFlag::Dest];

    fn name(self) -> &'static str {
        match self {
            WrapperFlag::Src => "--src",
            WrapperFlag::Dest => "--dest",
        }
    }

    /// Matches `--flag` and `--flag=value`.
    fn split(token: &OsStr) -> Option<(WrapperFlag, Option<&OsStr>)> {
        let token = token.as_bytes();
        Self::ALL.into_iter().find_map(|flag| {
            let rest = token.strip_prefix(flag.name().as_bytes())?;
            match rest.split_first() {
                None => Some((flag, None)),
                Some((b'=', value)) => Some((flag, Some(OsStr::from_bytes(value)))),
                Some(_) => None,
            }
        })
    }
}

fn is_flag_shaped(token: &OsStr) -> bool {
    token.len() > 1 && token.as_bytes().starts_with(b"-")
}

/// Splits the arguments (without the program name) into wrapper options,
/// forwarded options, image and command.
///
/// Wrapper parsing ends at `--` or at the first token that is not an
/// option, whichever comes first. That token (or the one after `--`) is the
/// image, and everything behind it is the command.
pub fn parse<I, S>(raw_args: I) -> Result<ParseOutcome, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut tokens = raw_args.into_iter().map(Into::into);
    let mut parsed = ParsedInvocation::default();

    parsed.image = loop {
        let token = tokens.next().ok_or(ParseError::MissingImage)?;

        match token.to_str() {
            Some(TERMINATOR) => break tokens.next().ok_or(ParseError::MissingImage)?,
            Some("--help") => return Ok(ParseOutcome::Help),
            Some("--version") => return Ok(ParseOutcome::Version),
            _ => {}
        }

        if let Some((flag, attached)) = WrapperFlag::split(&token) {
            let value = match attached {
                Some(value) if !value.is_empty() => Some(value.to_os_string()),
                Some(_) => None,
                // the flag is ours, so the next token is its value whatever
                // it looks like
                None => tokens.next(),
            };
            let Some(value) = value else {
                return Err(ParseError::UnknownOption(
                    token.to_string_lossy().into_owned(),
                ));
            };
            match flag {
                WrapperFlag::Src => parsed.source = Some(value),
                WrapperFlag::Dest => parsed.dest = Some(value),
            }
            continue;
        }

        if is_flag_shaped(&token) {
            parsed.forwarded_flags.push(token);
            continue;
        }

        break token;
    };

    parsed.command = tokens.collect();

    Ok(ParseOutcome::Run(parsed))
}
