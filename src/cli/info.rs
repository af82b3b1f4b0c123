//! Info command - show system information

use anyhow::Result;

use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    println!("Courtside v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    println!();
    println!("Configuration:");
    println!("  Config dir: {}", config_dir());
    println!("  History: {} messages, {} tokens", config.context.max_messages, config.context.max_tokens);
    println!("  Prune after: {}h", config.context.prune_after_hours);

    println!();
    println!("AI Providers:");
    check_provider(&config.ai.openai.api_key_env, "OpenAI");
    check_provider(&config.ai.claude.api_key_env, "Claude");

    Ok(())
}

fn config_dir() -> String {
    directories::ProjectDirs::from("com", "courtside", "courtside")
        .map(|p| p.config_dir().to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn check_provider(env_var: &str, name: &str) {
    let status = if std::env::var(env_var).is_ok() {
        "configured"
    } else {
        "not configured"
    };
    println!("  {}: {}", name, status);
}
