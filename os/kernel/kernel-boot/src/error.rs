use kernel_vmem::BootstrapError;

/// A condition that stops the boot.
///
/// The `Display` form is the one-line diagnostic printed before the kernel
/// halts. Tokens are borrowed from the boot argument blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError<'a> {
    #[error("command line arguments overflow")]
    ArgumentOverflow,
    #[error("command line argument {index} is not valid UTF-8")]
    ArgumentEncoding { index: usize },
    #[error("unknown option `{0}' (use -h for help)")]
    UnknownOption(&'a str),
    #[error("option `{0}' requires a value")]
    MissingOptionValue(&'a str),
    #[error("invalid value `{value}' for option `{option}'")]
    InvalidOptionValue { option: &'a str, value: &'a str },
    #[error("unknown action `{0}' (use -h for help)")]
    UnknownAction(&'a str),
    #[error("action `{action}' requires {required} argument(s)")]
    MissingActionArguments { action: &'a str, required: usize },
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}
