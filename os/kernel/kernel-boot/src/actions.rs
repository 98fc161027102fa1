//! # Action Dispatcher
//!
//! Actions follow the options and run in command-line order. Each one is a
//! name plus a fixed number of argument tokens:
//!
//! ```text
//! run alarm-single ls cat notes.txt
//! └──── run/2 ───┘ └ls┘ └─ cat/2 ─┘
//! ```
//!
//! Lookup failures and missing arguments are fatal; the actions before the
//! bad token have already run by then.

use crate::{BootError, BootOptions};
use log::info;

/// What an action does.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ActionKind {
    /// Run a user program or a kernel test.
    Run,
    /// List the root directory.
    #[cfg(feature = "filesys")]
    Ls,
    /// Print a file to the console.
    #[cfg(feature = "filesys")]
    Cat,
    /// Delete a file.
    #[cfg(feature = "filesys")]
    Rm,
    /// Copy a file from the scratch disk into the file system.
    #[cfg(feature = "filesys")]
    Put,
    /// Copy a file from the file system onto the scratch disk.
    #[cfg(feature = "filesys")]
    Get,
}

/// One entry of the action table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Action {
    pub name: &'static str,
    /// Tokens taken, the name included.
    pub arity: usize,
    pub kind: ActionKind,
}

/// Known actions; the first match wins.
pub static ACTIONS: &[Action] = &[
    Action {
        name: "run",
        arity: 2,
        kind: ActionKind::Run,
    },
    #[cfg(feature = "filesys")]
    Action {
        name: "ls",
        arity: 1,
        kind: ActionKind::Ls,
    },
    #[cfg(feature = "filesys")]
    Action {
        name: "cat",
        arity: 2,
        kind: ActionKind::Cat,
    },
    #[cfg(feature = "filesys")]
    Action {
        name: "rm",
        arity: 2,
        kind: ActionKind::Rm,
    },
    #[cfg(feature = "filesys")]
    Action {
        name: "put",
        arity: 2,
        kind: ActionKind::Put,
    },
    #[cfg(feature = "filesys")]
    Action {
        name: "get",
        arity: 2,
        kind: ActionKind::Get,
    },
];

impl Action {
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        ACTIONS.iter().find(|a| a.name == name)
    }

    fn invoke<E: ActionExecutor + ?Sized>(&self, argv: &[&str], exec: &mut E, options: &BootOptions) {
        match self.kind {
            ActionKind::Run => {
                let task = argv[1];
                info!("Executing '{task}':");
                exec.run_task(task, options);
                info!("Execution of '{task}' complete.");
            }
            #[cfg(feature = "filesys")]
            ActionKind::Ls => exec.list_files(),
            #[cfg(feature = "filesys")]
            ActionKind::Cat => exec.print_file(argv[1]),
            #[cfg(feature = "filesys")]
            ActionKind::Rm => exec.remove_file(argv[1]),
            #[cfg(feature = "filesys")]
            ActionKind::Put => exec.put_file(argv[1]),
            #[cfg(feature = "filesys")]
            ActionKind::Get => exec.get_file(argv[1]),
        }
    }
}

/// The subsystems that carry out actions.
pub trait ActionExecutor {
    /// Run `task` to completion.
    ///
    /// With `userprog` this starts the user program `task` and waits for
    /// it, unless `options.thread_tests` asks for the kernel test of that
    /// name instead.
    fn run_task(&mut self, task: &str, options: &BootOptions);

    #[cfg(feature = "filesys")]
    fn list_files(&mut self);

    #[cfg(feature = "filesys")]
    fn print_file(&mut self, file: &str);

    #[cfg(feature = "filesys")]
    fn remove_file(&mut self, file: &str);

    #[cfg(feature = "filesys")]
    fn put_file(&mut self, file: &str);

    #[cfg(feature = "filesys")]
    fn get_file(&mut self, file: &str);
}

/// Run every action in `tokens`, in order.
///
/// Returns the number of actions executed.
///
/// # Errors
/// - [`BootError::UnknownAction`] for a token that names no action.
/// - [`BootError::MissingActionArguments`] when fewer tokens remain than
///   the action takes.
pub fn dispatch<'a, E: ActionExecutor + ?Sized>(
    tokens: &[&'a str],
    exec: &mut E,
    options: &BootOptions,
) -> Result<usize, BootError<'a>> {
    let mut rest = tokens;
    let mut executed = 0;

    while let Some(&name) = rest.first() {
        let action = Action::find(name).ok_or(BootError::UnknownAction(name))?;
        let (argv, tail) = rest
            .split_at_checked(action.arity)
            .ok_or(BootError::MissingActionArguments {
                action: name,
                required: action.arity - 1,
            })?;

        action.invoke(argv, exec, options);
        executed += 1;
        rest = tail;
    }
    Ok(executed)
}
