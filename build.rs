use std::env;
use std::fs;
use std::path::Path;

// Solo se reenvían las variables del portal; el resto del .env no toca el build
const ENV_PREFIX: &str = "PORTAL_";

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                let Some((key, value)) = line.split_once('=') else {
                    continue;
                };
                let key = key.trim();
                let value = value.trim().trim_matches('"');

                if !key.starts_with(ENV_PREFIX) {
                    continue;
                }

                // El entorno real manda sobre el .env
                if env::var(key).is_err() {
                    println!("cargo:rustc-env={}={}", key, value);
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. Using built-in portal defaults (PORTAL_API_BASE_URL, PORTAL_RESOURCES, ...).");
    }

    for key in [
        "PORTAL_API_BASE_URL",
        "PORTAL_REQUEST_TIMEOUT_MS",
        "PORTAL_CREDENTIAL_FIELD",
        "PORTAL_RESOURCES",
        "PORTAL_DEMO_FALLBACK",
        "PORTAL_ENABLE_LOGGING",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
