use std::fs;
use std::path::Path;

/// Pull `#define NAME "value"` or `#define NAME value` out of a C header
fn define(contents: &str, name: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("#define"))
        .find_map(|l| {
            let mut parts = l.splitn(3, char::is_whitespace);
            parts.next()?;
            if parts.next()? != name {
                return None;
            }
            let value = parts.next()?.trim();
            Some(value.trim_matches('"').to_string())
        })
}

fn main() -> anyhow::Result<()> {
    // Necessary for ESP-IDF
    embuild::espidf::sysenv::output();

    println!("cargo:rerun-if-changed=ota_config.h");

    // Read update server and WiFi configuration if it exists
    let config_path = "ota_config.h";
    let contents = if Path::new(config_path).exists() {
        fs::read_to_string(config_path)?
    } else {
        println!("cargo:warning=ota_config.h not found! Copy ota_config.h.example to ota_config.h and set the firmware URL and WiFi credentials.");
        String::new()
    };

    for (name, fallback) in [
        ("OTA_FIRMWARE_URL", ""),
        ("OTA_RECV_TIMEOUT_MS", "5000"),
        ("WIFI_SSID", ""),
        ("WIFI_PASSWORD", ""),
    ] {
        let value = define(&contents, name).unwrap_or_else(|| fallback.to_string());
        println!("cargo:rustc-env={}={}", name, value);
    }

    Ok(())
}
