use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigurationError;

/// 字段名，对应数据表中的一列
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 页面上显示的标签：首字母大写
    pub fn label(&self) -> String {
        capitalize(&self.0)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 主字段列表减去忽略列表，保持主列表中的原始顺序
pub fn subtract(master: &[FieldName], ignored: &[FieldName]) -> Vec<FieldName> {
    master
        .iter()
        .filter(|field| !ignored.contains(*field))
        .cloned()
        .collect()
}

/// 一种记录类型的字段配置。
///
/// 启动时构建一次，之后只读共享。构建时完成全部校验：
/// 字段名非空、不含分隔符、不重复，忽略字段必须出现在主列表中。
/// 通过校验后，数据字段集合的编码与解码一定能够还原。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    master: Vec<FieldName>,
    ignored: Vec<FieldName>,
    data: Vec<FieldName>,
    separator: char,
}

impl RecordFields {
    pub fn new<M, I, S, T>(master: M, ignored: I, separator: char) -> Result<Self, ConfigurationError>
    where
        M: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let master: Vec<FieldName> = master.into_iter().map(FieldName::new).collect();
        let ignored: Vec<FieldName> = ignored.into_iter().map(FieldName::new).collect();

        let mut seen = HashSet::new();
        for field in &master {
            if field.as_str().is_empty() {
                return Err(ConfigurationError::EmptyFieldName);
            }
            if field.as_str().contains(separator) {
                return Err(ConfigurationError::FieldContainsSeparator {
                    field: field.to_string(),
                    separator,
                });
            }
            if !seen.insert(field.as_str()) {
                return Err(ConfigurationError::DuplicateField(field.to_string()));
            }
        }

        if let Some(unknown) = ignored.iter().find(|field| !master.contains(*field)) {
            return Err(ConfigurationError::UnknownIgnoredField(unknown.to_string()));
        }

        let data = subtract(&master, &ignored);

        Ok(Self {
            master,
            ignored,
            data,
            separator,
        })
    }

    pub fn master(&self) -> &[FieldName] {
        &self.master
    }

    pub fn ignored(&self) -> &[FieldName] {
        &self.ignored
    }

    /// 实际参与编码和传输的字段
    pub fn data_fields(&self) -> &[FieldName] {
        &self.data
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn is_data_field(&self, name: &str) -> bool {
        self.data.iter().any(|field| field.as_str() == name)
    }
}
