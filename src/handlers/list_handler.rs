use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::invoice::INVOICE_LISTING;
use crate::services::{invoice_store, listing, render};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    /// 排序列，逗号分隔
    pub c: Option<String>,
    /// 排序方向，与列按位置对应
    pub o: Option<String>,
}

/// 发票列表
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let order = listing::parse_sort(&INVOICE_LISTING, query.c.as_deref(), query.o.as_deref())?;
    tracing::debug!(">>> 查询发票列表, 排序: {:?}", order);

    let rows = invoice_store::list_invoices(&state.db, &state.config.table, &INVOICE_LISTING.selected, &order).await?;
    tracing::debug!("<<< 发票列表获取完毕, 数量: {}", rows.len());

    Ok(Html(render::render_listing(
        &INVOICE_LISTING,
        &rows,
        state.config.show_sort_links,
    )))
}
