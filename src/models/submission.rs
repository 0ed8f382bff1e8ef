use serde::Serialize;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::field_set::FieldName;

/// 携带字段清单令牌的隐藏字段
pub const TOKEN_FIELD: &str = "__lista_campos__";
pub const ACTION_FIELD: &str = "__accion__";
/// 修改已有记录时携带主键
pub const RECORD_ID_FIELD: &str = "__id__";

/// 从提交数据中取出的一个字段。
///
/// `value` 为 `None` 表示客户端没有提交这个字段，与提交了空字符串不同。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestedField {
    pub name: FieldName,
    pub value: Option<String>,
}

impl HarvestedField {
    pub fn new(name: FieldName, value: Option<String>) -> Self {
        Self { name, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormAction {
    /// 新建记录
    Grabar,
    /// 修改已有记录
    Modificar,
}

impl FormAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Grabar => "grabar",
            FormAction::Modificar => "modificar",
        }
    }
}

impl FromStr for FormAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grabar" => Ok(FormAction::Grabar),
            "modificar" => Ok(FormAction::Modificar),
            other => Err(AppError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: i32,
    pub action: FormAction,
    pub fields: Vec<HarvestedField>,
}
