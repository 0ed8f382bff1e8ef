use crate::error::AppError;
use crate::models::invoice::ListingLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// 只有 `ASC` 表示升序，其余取值一律降序
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "ASC" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// 解析列表页的排序参数。
///
/// `c` 和 `o` 都存在时才排序；多个列用逗号分隔，按位置与方向配对，
/// 缺少方向的列按降序处理。列名必须在可排序列表中。
pub fn parse_sort(
    layout: &ListingLayout,
    columns: Option<&str>,
    directions: Option<&str>,
) -> Result<Vec<SortKey>, AppError> {
    let (Some(columns), Some(directions)) = (columns, directions) else {
        return Ok(Vec::new());
    };

    let directions: Vec<&str> = directions.split(',').collect();

    columns
        .split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(_, column)| !column.is_empty())
        .map(|(position, column)| -> Result<SortKey, AppError> {
            let column = layout
                .sortable
                .iter()
                .copied()
                .find(|sortable| *sortable == column)
                .ok_or_else(|| AppError::InvalidSortField(column.to_string()))?;

            let direction = directions
                .get(position)
                .map(|raw| SortDirection::parse(raw))
                .unwrap_or(SortDirection::Desc);

            Ok(SortKey { column, direction })
        })
        .collect()
}
