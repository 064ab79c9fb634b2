use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rigshop_core::config::{resolve_config_path, AppConfig};
use toml::Value;

/// Renders effective configuration with the source each value came from.
pub fn run(config: &AppConfig, explicit_path: Option<&Path>) -> String {
    let config_file_path = resolve_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let lines = [
        "effective config (source precedence: override > env > file > default):".to_string(),
        render_line(
            "dispatcher.terminator",
            &config.dispatcher.terminator,
            source("dispatcher.terminator", &["RIGSHOP_DISPATCHER_TERMINATOR"]),
        ),
        render_line(
            "dispatcher.halt_on_error",
            &config.dispatcher.halt_on_error.to_string(),
            source("dispatcher.halt_on_error", &["RIGSHOP_DISPATCHER_HALT_ON_ERROR"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["RIGSHOP_LOGGING_LEVEL", "RIGSHOP_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["RIGSHOP_LOGGING_FORMAT", "RIGSHOP_LOG_FORMAT"]),
        ),
    ];

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, render_line};

    #[test]
    fn nested_key_paths_are_resolved() {
        let doc: Value = "[logging]\nlevel = \"warn\"\n".parse().expect("valid toml");

        assert!(contains_path(&doc, "logging.level"));
        assert!(!contains_path(&doc, "logging.format"));
        assert!(!contains_path(&doc, "dispatcher.terminator"));
    }

    #[test]
    fn lines_carry_source_attribution() {
        assert_eq!(
            render_line("logging.level", "info", "default".to_string()),
            "- logging.level = info (source: default)"
        );
    }
}
