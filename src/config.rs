use std::{env, str::FromStr};

use tracing::{info, warn};

use crate::error::ConfigurationError;
use crate::models::invoice::DEFAULT_TABLE;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub table: String,
    /// 字段清单令牌内的分隔符，表单生成端与接收端必须一致
    pub separator: char,
    pub show_sort_links: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigurationError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigurationError::MissingVar("DATABASE_URL"))?;

        let table: String = try_load(&lookup, "APP_TABLE", DEFAULT_TABLE)?;
        if !is_identifier(&table) {
            return Err(ConfigurationError::InvalidTableName(table));
        }

        Ok(Self {
            database_url,
            port: try_load(&lookup, "APP_PORT", "3000")?,
            table,
            separator: parse_separator(&try_load::<String>(&lookup, "FIELD_SEPARATOR", " ")?)?,
            show_sort_links: try_load(&lookup, "APP_SORT_LINKS", "true")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigurationError> {
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default:?}");
        default.to_string()
    });

    value.parse().map_err(|_| {
        warn!("Invalid {key} value: {value:?}");
        ConfigurationError::InvalidVar { key, value }
    })
}

fn parse_separator(raw: &str) -> Result<char, ConfigurationError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(separator), None) => Ok(separator),
        _ => Err(ConfigurationError::InvalidSeparator(raw.to_string())),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
