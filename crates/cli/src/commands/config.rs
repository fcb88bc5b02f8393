use std::env;
use std::fs;
use std::path::Path;

use catalog_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ConfigField {
            key_path: "database.url",
            env_keys: &["CATALOG_DATABASE_URL"],
            value: config.database.url.clone(),
        },
        ConfigField {
            key_path: "database.max_connections",
            env_keys: &["CATALOG_DATABASE_MAX_CONNECTIONS"],
            value: config.database.max_connections.to_string(),
        },
        ConfigField {
            key_path: "database.timeout_secs",
            env_keys: &["CATALOG_DATABASE_TIMEOUT_SECS"],
            value: config.database.timeout_secs.to_string(),
        },
        ConfigField {
            key_path: "server.bind_address",
            env_keys: &["CATALOG_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        ConfigField {
            key_path: "server.port",
            env_keys: &["CATALOG_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        ConfigField {
            key_path: "server.static_dir",
            env_keys: &["CATALOG_SERVER_STATIC_DIR"],
            value: config
                .server
                .static_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
        },
        ConfigField {
            key_path: "catalog.seed_on_startup",
            env_keys: &["CATALOG_SEED_ON_STARTUP"],
            value: config.catalog.seed_on_startup.to_string(),
        },
        ConfigField {
            key_path: "logging.level",
            env_keys: &["CATALOG_LOGGING_LEVEL", "CATALOG_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        ConfigField {
            key_path: "logging.format",
            env_keys: &["CATALOG_LOGGING_FORMAT", "CATALOG_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
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
    use std::path::Path;

    use catalog_core::config::AppConfig;
    use toml::Value;

    use super::{contains_path, effective_fields, field_source, render_line};

    fn file_doc() -> Value {
        "[server]\nport = 9090\n\n[catalog]\nseed_on_startup = false\n"
            .parse::<Value>()
            .expect("valid toml")
    }

    #[test]
    fn nested_keys_are_found_in_file_document() {
        let doc = file_doc();

        assert!(contains_path(&doc, "server.port"));
        assert!(contains_path(&doc, "catalog.seed_on_startup"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_names_the_config_path() {
        let doc = file_doc();

        let source = field_source(
            "server.port",
            &["CATALOG_TEST_UNSET_PORT_KEY"],
            Some(&doc),
            Some(Path::new("config/catalog.toml")),
        );
        assert_eq!(source, "file (config/catalog.toml)");

        let fallback =
            field_source("logging.level", &["CATALOG_TEST_UNSET_LEVEL_KEY"], Some(&doc), None);
        assert_eq!(fallback, "default");
    }

    #[test]
    fn every_config_section_is_reported() {
        let fields = effective_fields(&AppConfig::default());
        let keys = fields.iter().map(|field| field.key_path).collect::<Vec<_>>();

        for section in ["database.", "server.", "catalog.", "logging."] {
            assert!(keys.iter().any(|key| key.starts_with(section)), "missing {section} fields");
        }
        assert!(fields.iter().any(|field| field.value == "<unset>"));
    }

    #[test]
    fn rendered_line_shows_value_and_source() {
        assert_eq!(
            render_line("server.port", "8080", "default".to_string()),
            "- server.port = 8080 (source: default)"
        );
    }
}
