use recipe_manager::config::AppConfig;

/// Bundled config for mobile builds (iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // .env next to the binary wins during desktop development
    if dotenvy::dotenv().is_ok() {
        return;
    }
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for line in BUNDLED_CONFIG.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            // Real environment overrides the bundled defaults
            if std::env::var(key).is_err() {
                // SAFETY: We're setting env vars at startup before any threads are spawned
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt().try_init();
    load_dotenv();

    let config = AppConfig::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        people = config.default_people,
        "starting recipe manager"
    );

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(recipe_manager::ui::App);
    Ok(())
}
