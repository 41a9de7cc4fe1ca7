use std::env;
use std::fs;
use std::path::Path;

// macOS only grants camera access to binaries that ship an Info.plist with
// NSCameraUsageDescription, so place it next to the built executable.
fn main() {
    println!("cargo:rerun-if-changed=Info.plist");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("macos") {
        return;
    }

    let (Ok(out_dir), Ok(manifest_dir)) = (env::var("OUT_DIR"), env::var("CARGO_MANIFEST_DIR")) else {
        return;
    };

    let src = Path::new(&manifest_dir).join("Info.plist");
    let dst = Path::new(&out_dir).join("../../../Info.plist");

    if src.exists() {
        if let Err(e) = fs::copy(&src, &dst) {
            println!("cargo:warning=Failed to copy Info.plist: {}", e);
        }
    }
}
