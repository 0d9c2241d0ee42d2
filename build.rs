//! Build script: maps the width features and the target architecture onto the
//! backend family cfg consumed by `src/backend/mod.rs`.
//!
//! - `lanewise_sse2`: x86_64 target, 128-bit width, `portable` not requested.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(lanewise_sse2)");
    println!("cargo:rerun-if-changed=build.rs");

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let wide = env::var_os("CARGO_FEATURE_WIDTH_256").is_some()
        || env::var_os("CARGO_FEATURE_WIDTH_512").is_some();
    let portable = env::var_os("CARGO_FEATURE_PORTABLE").is_some();

    if target_arch == "x86_64" && !wide && !portable {
        println!("cargo:rustc-cfg=lanewise_sse2");
    }
}
