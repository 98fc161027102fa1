use kernel_info::loader::{LOADER_BASE, LOADER_END};
use kernel_info::memory::{KERNEL_BASE, LOADER_PHYS_BASE};
use std::{env, path::PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let ld = manifest_dir.join("kernel.ld");
    println!("cargo:rerun-if-changed={}", ld.display());

    // Sanity checks (fail fast during build)
    assert_eq!(
        KERNEL_BASE & ((1u64 << 21) - 1),
        0,
        "KERNEL_BASE must be 2 MiB aligned (got {KERNEL_BASE:#x})"
    );
    assert_eq!(
        LOADER_PHYS_BASE & 0xfff,
        0,
        "LOADER_PHYS_BASE must be 4 KiB aligned (got {LOADER_PHYS_BASE:#x})"
    );
    assert!(
        LOADER_END <= LOADER_PHYS_BASE,
        "kernel image would overlap the loader at {LOADER_BASE:#x}"
    );

    // The host build is a stub; only the bare-metal binary is linked here.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    println!("cargo:rustc-link-arg-bins=-T{}", ld.display());
    println!("cargo:rustc-link-arg-bins=--defsym=KERNEL_BASE={KERNEL_BASE:#x}");
    println!("cargo:rustc-link-arg-bins=--defsym=LOADER_PHYS_BASE={LOADER_PHYS_BASE:#x}");
}
