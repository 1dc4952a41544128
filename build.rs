/// Expose the compilation target triple as an environment variable at build time.
///
/// `codecritic version` prints it alongside the package version.
fn main() {
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=TARGET={target}");
    }
}
