//! Test-only object store client that copies the body into a local directory.
//!
//! Usage: `upload_stub <root> <key> <file> [--fail]`

use std::fs;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: upload_stub <root> <key> <file> [--fail]");
        std::process::exit(2);
    }
    if args.iter().any(|arg| arg == "--fail") {
        eprintln!("AccessDenied: stub configured to fail");
        std::process::exit(1);
    }

    let dest = Path::new(&args[0]).join(&args[1]);
    if let Some(parent) = dest.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!("failed to create {}: {err}", parent.display());
            std::process::exit(1);
        }
    }
    if let Err(err) = fs::copy(&args[2], &dest) {
        eprintln!("failed to copy {} to {}: {err}", args[2], dest.display());
        std::process::exit(1);
    }
    println!("{{\"ETag\": \"stub\"}}");
}
