use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ridewise_core::config::AppConfig;
use toml::Value;

struct Field<'a> {
    key_path: &'a str,
    value: String,
    env_keys: &'a [&'a str],
}

pub fn run(config: &AppConfig, explicit_path: Option<&Path>) -> String {
    let config_file_path = detect_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let settings = &config.recommendations;
    let weights = &settings.weights;
    let fields = [
        Field {
            key_path: "recommendations.max_results",
            value: settings.max_results.to_string(),
            env_keys: &["RIDEWISE_RECOMMENDATIONS_MAX_RESULTS"],
        },
        Field {
            key_path: "recommendations.budget_tolerance",
            value: settings.budget_tolerance.to_string(),
            env_keys: &["RIDEWISE_RECOMMENDATIONS_BUDGET_TOLERANCE"],
        },
        Field {
            key_path: "recommendations.budget_pick_factor",
            value: settings.budget_pick_factor.to_string(),
            env_keys: &["RIDEWISE_RECOMMENDATIONS_BUDGET_PICK_FACTOR"],
        },
        Field {
            key_path: "recommendations.perfect_match_threshold",
            value: settings.perfect_match_threshold.to_string(),
            env_keys: &[],
        },
        Field {
            key_path: "recommendations.best_value_threshold",
            value: settings.best_value_threshold.to_string(),
            env_keys: &[],
        },
        Field {
            key_path: "recommendations.weights",
            value: format!(
                "budget={} brand={} fuel={} feature={} rating={}",
                weights.budget, weights.brand, weights.fuel, weights.feature, weights.rating
            ),
            env_keys: &[],
        },
        Field {
            key_path: "catalog.path",
            value: config
                .catalog
                .path
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<built-in demo catalog>".to_string()),
            env_keys: &["RIDEWISE_CATALOG_PATH"],
        },
        Field {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["RIDEWISE_SERVER_BIND_ADDRESS"],
        },
        Field {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["RIDEWISE_SERVER_PORT"],
        },
        Field {
            key_path: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["RIDEWISE_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["RIDEWISE_LOGGING_LEVEL", "RIDEWISE_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["RIDEWISE_LOGGING_FORMAT", "RIDEWISE_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|field| {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        render_line(field.key_path, &field.value, source)
    }));

    lines.join("\n")
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("ridewise.toml"), PathBuf::from("config/ridewise.toml")]
        .into_iter()
        .find(|path| path.exists())
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
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
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

    use super::contains_path;

    #[test]
    fn nested_key_paths_are_resolved() {
        let doc: Value = r#"
[recommendations.weights]
budget = 30
"#
        .parse()
        .expect("toml");

        assert!(contains_path(&doc, "recommendations.weights"));
        assert!(contains_path(&doc, "recommendations.weights.budget"));
        assert!(!contains_path(&doc, "recommendations.max_results"));
    }
}
