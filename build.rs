use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};

// Exposes a short hash of static/ as STATIC_HASH for cache-busting asset URLs.
fn main() {
    println!("cargo:rerun-if-changed=static/");

    let mut hasher = DefaultHasher::new();

    let mut assets: Vec<_> = fs::read_dir("static")
        .expect("static/ directory is missing")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    assets.sort();

    for path in assets {
        let contents = fs::read(&path).expect("unreadable static asset");
        path.file_name().hash(&mut hasher);
        contents.hash(&mut hasher);
    }

    let hash = format!("{:016x}", hasher.finish());
    println!("cargo:rustc-env=STATIC_HASH={}", &hash[..8]);
}
