//! # Option Parser
//!
//! Options come first on the command line and start with `-`; the first
//! token that does not ends option parsing and starts the action list.
//!
//! | Option | Effect |
//! |--------|--------|
//! | `-h` | print usage and power off |
//! | `-q` | power off after the actions (or on a fatal error) |
//! | `-f` | format the file system disk (`filesys`) |
//! | `-rs=SEED` | seed the pseudo-random generator |
//! | `-mlfqs` | use the multi-level feedback queue scheduler |
//! | `-ul=COUNT` | limit user memory to `COUNT` pages (`userprog`) |
//! | `-threads-tests` | `run` executes kernel tests (`userprog`) |

use crate::BootError;
use core::str::FromStr;

/// Thread scheduling policy selected on the command line.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum SchedulerPolicy {
    #[default]
    RoundRobin,
    Mlfqs,
}

/// Boot configuration, fixed once the options are parsed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BootOptions {
    pub power_off_when_done: bool,
    pub format_filesys: bool,
    pub random_seed: u32,
    pub scheduler: SchedulerPolicy,
    /// Most pages handed to user processes; `usize::MAX` for no limit.
    pub user_page_limit: usize,
    pub thread_tests: bool,
}

impl BootOptions {
    pub const DEFAULT: Self = Self {
        power_off_when_done: false,
        format_filesys: false,
        random_seed: 0,
        scheduler: SchedulerPolicy::RoundRobin,
        user_page_limit: usize::MAX,
        thread_tests: false,
    };
}

impl Default for BootOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of option parsing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParsedCommandLine<'s, 'a> {
    /// `-h` was given; print usage and power off.
    Help,
    /// Boot with `options`, then run `actions`.
    Boot {
        options: BootOptions,
        actions: &'s [&'a str],
    },
}

/// Applies options one by one.
///
/// The options seen before a failure stay visible through
/// [`options`](Self::options), so a fatal error can still honour `-q`.
#[derive(Debug, Default)]
pub struct OptionParser {
    options: BootOptions,
}

impl OptionParser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: BootOptions::DEFAULT,
        }
    }

    /// Options applied so far.
    #[must_use]
    pub const fn options(&self) -> &BootOptions {
        &self.options
    }

    /// Consume the leading options of `args`.
    ///
    /// # Errors
    /// [`BootError::UnknownOption`], [`BootError::MissingOptionValue`] or
    /// [`BootError::InvalidOptionValue`] for the first bad option.
    pub fn parse<'s, 'a>(
        &mut self,
        args: &'s [&'a str],
    ) -> Result<ParsedCommandLine<'s, 'a>, BootError<'a>> {
        let split = args
            .iter()
            .position(|arg| !arg.starts_with('-'))
            .unwrap_or(args.len());
        let (options, actions) = args.split_at(split);

        for &arg in options {
            let (name, value) = match arg.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (arg, None),
            };
            if name == "-h" {
                return Ok(ParsedCommandLine::Help);
            }
            self.apply(name, value)?;
        }

        Ok(ParsedCommandLine::Boot {
            options: self.options,
            actions,
        })
    }

    fn apply<'a>(&mut self, name: &'a str, value: Option<&'a str>) -> Result<(), BootError<'a>> {
        let opts = &mut self.options;
        match name {
            "-q" => opts.power_off_when_done = true,
            #[cfg(feature = "filesys")]
            "-f" => opts.format_filesys = true,
            "-rs" => opts.random_seed = numeric(name, value)?,
            "-mlfqs" => opts.scheduler = SchedulerPolicy::Mlfqs,
            #[cfg(feature = "userprog")]
            "-ul" => opts.user_page_limit = numeric(name, value)?,
            #[cfg(feature = "userprog")]
            "-threads-tests" => opts.thread_tests = true,
            _ => return Err(BootError::UnknownOption(name)),
        }
        Ok(())
    }
}

fn numeric<'a, T: FromStr>(option: &'a str, value: Option<&'a str>) -> Result<T, BootError<'a>> {
    let value = value.ok_or(BootError::MissingOptionValue(option))?;
    value
        .parse()
        .map_err(|_| BootError::InvalidOptionValue { option, value })
}

/// Parse the leading options of `args` with a fresh [`OptionParser`].
///
/// # Errors
/// See [`OptionParser::parse`].
pub fn parse_options<'s, 'a>(
    args: &'s [&'a str],
) -> Result<ParsedCommandLine<'s, 'a>, BootError<'a>> {
    OptionParser::new().parse(args)
}
