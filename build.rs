//! This build script embeds the build time as the initial clock reference and, for the
//! bare-metal target, copies `memory.x` into a directory where the linker can find it.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // Create rs file with current UTC time
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_TIME: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    // Only the firmware needs the memory layout and the linker scripts.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(include_bytes!("memory.x"))
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // By default, Cargo will re-run a build script whenever any file in the project changes,
    // which keeps `UTC_TIME` close to the flashing time.
    // println!("cargo:rerun-if-changed=memory.x");
}
