use std::env;

fn main() {
    let version =
        env::var("VERIFY_VERSION").unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rerun-if-env-changed=VERIFY_VERSION");
    println!("cargo:rustc-env=VERIFY_VERSION={version}");
}
