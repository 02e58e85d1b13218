use std::{env, fs, path::PathBuf};

fn main() {
    // 1) Handle memory.x based on target
    let target = env::var("TARGET").unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    if target.starts_with("thumbv8m") {
        // Pico 2 (ARM core)
        copy_memory_x("memory-pico2.x", &out_dir);
    } else if target.starts_with("thumbv6m") {
        // Pico 1
        copy_memory_x("memory-pico1.x", &out_dir);
    }

    // 2) Load optional env files (still supported for convenience)
    let _ = dotenvy::from_filename(".env");
    load_home_env(".pico.env");

    // 3) Provide fallbacks so the crate compiles without .env
    let address = env_or_default("SEG7_I2C_ADDRESS", "0x70");
    let brightness = env_or_default("SEG7_BRIGHTNESS", "15");
    let blink = env_or_default("SEG7_BLINK", "off");

    // 4) Expose as compile-time constants
    println!("cargo:rustc-env=SEG7_I2C_ADDRESS={address}");
    println!("cargo:rustc-env=SEG7_BRIGHTNESS={brightness}");
    println!("cargo:rustc-env=SEG7_BLINK={blink}");

    // Optional: don't rebuild unless these change
    println!("cargo:rerun-if-env-changed=SEG7_I2C_ADDRESS");
    println!("cargo:rerun-if-env-changed=SEG7_BRIGHTNESS");
    println!("cargo:rerun-if-env-changed=SEG7_BLINK");
    println!("cargo:rerun-if-changed=.env");
}

fn copy_memory_x(file: &str, out_dir: &PathBuf) {
    let memory_x = fs::read_to_string(file).unwrap_or_else(|_| panic!("Failed to read {file}"));
    let dest = out_dir.join("memory.x");
    fs::write(&dest, memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={file}");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let path = home.join(file);
    let _ = dotenvy::from_path(&path);
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
