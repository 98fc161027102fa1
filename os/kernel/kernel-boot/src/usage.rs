use core::fmt;

/// Help text printed for `-h`.
///
/// Lists only what the current feature set accepts.
pub struct Usage;

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            "\nCommand line syntax: [OPTION...] [ACTION...]\n\
             Options must precede actions.\n\
             Actions are executed in the order specified.\n\
             \nAvailable actions:\n",
        )?;
        #[cfg(feature = "userprog")]
        f.write_str("  run 'PROG [ARG...]' Run PROG and wait for it to complete.\n")?;
        #[cfg(not(feature = "userprog"))]
        f.write_str("  run TEST           Run TEST.\n")?;
        #[cfg(feature = "filesys")]
        f.write_str(
            "  ls                 List files in the root directory.\n\
             \x20 cat FILE           Print FILE to the console.\n\
             \x20 rm FILE            Delete FILE.\n\
             Use these actions indirectly via `pintos' -g and -p options:\n\
             \x20 put FILE           Put FILE into file system from scratch disk.\n\
             \x20 get FILE           Get FILE from file system into scratch disk.\n",
        )?;

        f.write_str(
            "\nOptions:\n\
             \x20 -h                 Print this help message and power off.\n\
             \x20 -q                 Power off VM after actions or on panic.\n",
        )?;
        #[cfg(feature = "filesys")]
        f.write_str("  -f                 Format file system disk during startup.\n")?;
        f.write_str(
            "  -rs=SEED           Set random number seed to SEED.\n\
             \x20 -mlfqs             Use multi-level feedback queue scheduler.\n",
        )?;
        #[cfg(feature = "userprog")]
        f.write_str(
            "  -ul=COUNT          Limit user memory to COUNT pages.\n\
             \x20 -threads-tests     Run kernel tests instead of user programs.\n",
        )?;
        Ok(())
    }
}
