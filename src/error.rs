use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 字段清单或环境配置不合法，只会在启动阶段出现
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("字段名不能为空")]
    EmptyFieldName,

    #[error("字段名 `{field}` 含有分隔符 {separator:?}")]
    FieldContainsSeparator { field: String, separator: char },

    #[error("字段 `{0}` 重复声明")]
    DuplicateField(String),

    #[error("忽略字段 `{0}` 不在主字段列表中")]
    UnknownIgnoredField(String),

    #[error("分隔符必须是单个字符: {0:?}")]
    InvalidSeparator(String),

    #[error("环境变量 {0} 未设置")]
    MissingVar(&'static str),

    #[error("环境变量 {key} 取值无效: {value}")]
    InvalidVar { key: &'static str, value: String },

    #[error("表名不合法: {0}")]
    InvalidTableName(String),
}

/// 字段清单令牌无法还原
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("不是合法的 base64")]
    InvalidBase64,

    #[error("解码结果不是 UTF-8 文本")]
    InvalidUtf8,

    #[error("含有空字段名")]
    EmptyFieldName,

    #[error("字段 `{0}` 重复")]
    DuplicateField(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("字段清单令牌无效: {0}")]
    Decode(#[from] DecodeError),

    #[error("缺少隐藏字段 {0}")]
    MissingField(&'static str),

    #[error("字段 `{0}` 不属于该记录类型")]
    UnknownField(String),

    #[error("未知操作: {0}")]
    UnknownAction(String),

    #[error("不可排序的字段: {0}")]
    InvalidSortField(String),

    #[error("记录编号无效: {0}")]
    InvalidId(String),

    #[error("没有可更新的字段")]
    EmptySubmission,

    #[error("记录 {0} 不存在")]
    NotFound(i32),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Decode(_)
            | AppError::MissingField(_)
            | AppError::UnknownField(_)
            | AppError::UnknownAction(_)
            | AppError::InvalidSortField(_)
            | AppError::InvalidId(_)
            | AppError::EmptySubmission => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("!!! 请求处理失败: {:?}", self);
        } else {
            tracing::warn!("--- 请求被拒绝: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
