use once_cell::sync::Lazy;

use crate::error::ConfigurationError;
use crate::models::field_set::RecordFields;

pub const DEFAULT_TABLE: &str = "facturas";
pub const PRIMARY_KEY: &str = "id";

/// 发票记录的全部字段，顺序即表单和 SQL 中的列顺序
pub const INVOICE_FIELDS: [&str; 18] = [
    "id",
    "idk",
    "grupo",
    "descripcion",
    "cliente_nombre",
    "cliente_direccion",
    "cliente_cif",
    "proveedor_nombre",
    "proveedor_direccion",
    "proveedor_cif",
    "numero",
    "importe_base",
    "tipo_iva",
    "iva",
    "importe_total",
    "fecha_factura",
    "fecha_alta",
    "fecha_ultimo",
];

/// 主键和副键不作为可编辑数据传输
pub const INVOICE_IGNORED: [&str; 2] = ["id", "idk"];

/// 新建发票时自动填入当前时间的字段
pub const INVOICE_DATE_FIELD: &str = "fecha_factura";

pub fn invoice_fields(separator: char) -> Result<RecordFields, ConfigurationError> {
    RecordFields::new(INVOICE_FIELDS, INVOICE_IGNORED, separator)
}

/// 发票列表页的列配置
#[derive(Debug)]
pub struct ListingLayout {
    /// 查询的列，必须包含主键
    pub selected: Vec<&'static str>,
    /// 页面上显示的列
    pub shown: Vec<&'static str>,
    /// 允许排序的列
    pub sortable: Vec<&'static str>,
    /// 单元格链接到编辑表单的列
    pub linked: Vec<&'static str>,
}

impl ListingLayout {
    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable.contains(&column)
    }

    pub fn is_linked(&self, column: &str) -> bool {
        self.linked.contains(&column)
    }
}

pub static INVOICE_LISTING: Lazy<ListingLayout> = Lazy::new(|| ListingLayout {
    selected: words("id idk cliente_nombre proveedor_nombre numero fecha_factura importe_base tipo_iva iva importe_total"),
    shown: words("cliente_nombre proveedor_nombre numero fecha_factura importe_base tipo_iva iva importe_total"),
    sortable: words("cliente_nombre proveedor_nombre numero fecha_factura importe_total"),
    linked: words("numero importe_total"),
});

fn words(list: &'static str) -> Vec<&'static str> {
    list.split_whitespace().collect()
}
