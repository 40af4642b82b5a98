use std::{env, fs, path::PathBuf};

fn main() {
    // Handle memory.x based on target. Host builds (tests) need nothing here.
    let Ok(target) = env::var("TARGET") else {
        return;
    };
    let Ok(out_dir) = env::var("OUT_DIR").map(PathBuf::from) else {
        return;
    };

    if target.starts_with("thumbv6m") {
        // Pico 1: copy our memory-pico1.x to OUT_DIR as memory.x
        let memory_x =
            fs::read_to_string("memory-pico1.x").expect("Failed to read memory-pico1.x");
        let dest = out_dir.join("memory.x");
        fs::write(&dest, memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed=memory-pico1.x");

        // Only the firmware demo links; the library itself never does.
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
