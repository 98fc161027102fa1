//! # Boot Sequence
//!
//! The fixed bring-up order, from the decoded command line to the hand-off
//! to the scheduler (or to the shutdown sequencer under `-q`).
//!
//! Every failure on the way is fatal: [`run`] reports it as a
//! [`BootFailure`], and [`boot`] turns that into one `Kernel PANIC` line
//! followed by a halt.

use crate::{
    BootError, BootOptions, Collaborators, CommandLineEcho, InitStage, OptionParser,
    ParsedCommandLine, Platform, Random, Usage, dispatch, read_command_line, shutdown,
};
use core::fmt;
use kernel_vmem::{KernelLayout, build_kernel_address_space};
use log::{debug, error, info};

/// How a boot that did not fail ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BootOutcome {
    /// Usage was printed for `-h`.
    Help,
    /// All subsystems are up and `actions` actions ran.
    Completed { options: BootOptions, actions: usize },
}

/// A fatal boot error.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct BootFailure<'a> {
    pub error: BootError<'a>,
    /// `-q` had been seen when the error occurred.
    pub power_off: bool,
}

/// Bring the kernel up and run the command-line actions.
///
/// `blob` and `count` are the loader's argument area and token count.
///
/// # Errors
/// Any [`BootError`], wrapped with whether `-q` was already in effect.
pub fn run<'a, C, P>(
    blob: &'a [u8],
    count: u32,
    services: &mut C,
    platform: &mut P,
) -> Result<BootOutcome, BootFailure<'a>>
where
    C: Collaborators + ?Sized,
    P: Platform + ?Sized,
{
    let args = read_command_line(blob, count).map_err(|error| BootFailure {
        error,
        power_off: false,
    })?;
    platform.console(format_args!("{}\n", CommandLineEcho(args.as_slice())));

    let mut parser = OptionParser::new();
    let (options, actions) = match parser.parse(args.as_slice()) {
        Ok(ParsedCommandLine::Boot { options, actions }) => (options, actions),
        Ok(ParsedCommandLine::Help) => {
            platform.console(format_args!("{Usage}"));
            return Ok(BootOutcome::Help);
        }
        Err(error) => {
            return Err(BootFailure {
                error,
                power_off: parser.options().power_off_when_done,
            });
        }
    };
    debug!("Boot options: {options:?}");
    let power_off = options.power_off_when_done;
    let fail = |error| BootFailure { error, power_off };

    services.configure(&options, Random::new(options.random_seed));
    for &stage in InitStage::BEFORE_PAGING {
        services.init(stage, &options);
    }

    let mem_end = services.init_memory(&options);
    services.init(InitStage::Heap, &options);

    let layout = KernelLayout {
        mem_end,
        kernel_text: platform.kernel_text(),
    };
    let map = build_kernel_address_space(platform.phys_mapper(), services.frame_allocator(), &layout)
        .map_err(|err| fail(err.into()))?;
    platform.activate(&map);

    for &stage in InitStage::AFTER_PAGING {
        services.init(stage, &options);
    }
    info!("Boot complete.");

    let executed = dispatch(actions, services, &options).map_err(fail)?;
    Ok(BootOutcome::Completed {
        options,
        actions: executed,
    })
}

/// [`run`], then power off, hand over to the scheduler or die.
pub fn boot<C, P>(blob: &[u8], count: u32, services: &mut C, platform: &mut P) -> !
where
    C: Collaborators + ?Sized,
    P: Platform + ?Sized,
{
    match run(blob, count, services, platform) {
        Ok(BootOutcome::Help) => shutdown(services, platform),
        Ok(BootOutcome::Completed { options, .. }) if options.power_off_when_done => {
            shutdown(services, platform)
        }
        Ok(BootOutcome::Completed { .. }) => services.exit_initial_thread(),
        Err(failure) => fatal(platform, failure.power_off, &failure.error),
    }
}

/// Report `diagnostic` and stop; powers off instead of halting when
/// `power_off` is set.
pub fn fatal<P: Platform + ?Sized>(platform: &mut P, power_off: bool, diagnostic: &dyn fmt::Display) -> ! {
    error!("Kernel PANIC: {diagnostic}");
    if power_off {
        platform.power_off()
    } else {
        platform.halt()
    }
}
