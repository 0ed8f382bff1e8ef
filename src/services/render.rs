use crate::models::field_set::{capitalize, FieldName};
use crate::models::invoice::{ListingLayout, PRIMARY_KEY};
use crate::models::submission::{FormAction, ACTION_FIELD, RECORD_ID_FIELD, TOKEN_FIELD};
use crate::services::field_codec::EncodedFieldToken;
use crate::services::listing::SortDirection;

pub const FORM_PATH: &str = "/facturas/form";
pub const SUBMIT_PATH: &str = "/facturas";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn html_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
	<meta charset="UTF-8">
	<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// 一个文本输入框。name 与字段名完全一致，标签和提示使用首字母大写形式
pub fn render_input(field: &FieldName, value: &str) -> String {
    let name = escape_html(field.as_str());
    let label = escape_html(&field.label());
    format!(
        r#"{label} <input type="text" name="{name}" id="{name}" value="{value}" title="{label}">"#,
        value = escape_html(value),
    )
}

/// 按字段顺序生成全部输入框
pub fn render_inputs<'a>(fields: impl IntoIterator<Item = (&'a FieldName, &'a str)>) -> String {
    fields
        .into_iter()
        .map(|(field, value)| render_input(field, value))
        .collect::<Vec<_>>()
        .join("<br>\n")
}

pub fn render_invoice_form(inputs: &str, action: FormAction, token: &EncodedFieldToken, id: Option<i32>) -> String {
    let record_id = id
        .map(|id| format!("\n\t<input type=\"hidden\" name=\"{RECORD_ID_FIELD}\" value=\"{id}\"/>"))
        .unwrap_or_default();

    let body = format!(
        r#"	<form action="{SUBMIT_PATH}" method="post">
	{inputs}
	<input type="hidden" name="{ACTION_FIELD}" value="{action}"/>
	<input type="hidden" name="{TOKEN_FIELD}" value="{token}"/>{record_id}
	<br>
	<input type="submit" value="Enviar datos"/>
	</form>"#,
        action = action.as_str(),
        token = escape_html(token.as_str()),
    );

    html_shell("Factura", &body)
}

/// 字段清单页：输入框本身，外加一份转义后的源码方便复制
pub fn render_field_list(inputs: &str) -> String {
    let body = format!(
        r#"	<textarea onclick="this.select();">
{source}
	</textarea>
	<br>
	{inputs}"#,
        source = escape_html(inputs),
    );

    html_shell("Generador: listado de campos", &body)
}

fn sort_links(column: &str) -> String {
    let link = |direction: SortDirection, image: &str| {
        format!(
            r#"<a href="?c={column}&amp;o={direction}"><img src="img/{image}" alt="{direction}"/></a>"#,
            column = escape_html(column),
            direction = direction.as_sql(),
        )
    };
    format!(
        "<span>{}{}</span>",
        link(SortDirection::Asc, "arriba.gif"),
        link(SortDirection::Desc, "abajo.gif")
    )
}

/// 发票列表。`rows` 的列顺序与 `layout.selected` 一致
pub fn render_listing(layout: &ListingLayout, rows: &[Vec<Option<String>>], show_sort_links: bool) -> String {
    let key_index = layout.selected.iter().position(|column| *column == PRIMARY_KEY);
    let shown: Vec<(usize, &str)> = layout
        .selected
        .iter()
        .enumerate()
        .filter(|(_, column)| layout.shown.contains(*column))
        .map(|(index, column)| (index, *column))
        .collect();

    let mut html = String::from("\t<table>\n\t<tr>");
    for (_, column) in &shown {
        let links = if show_sort_links && layout.is_sortable(column) {
            sort_links(column)
        } else {
            String::new()
        };
        html.push_str(&format!("\n\t\t<th>{} {}</th>", escape_html(&capitalize(column)), links));
    }
    html.push_str("\n\t</tr>");

    for row in rows {
        let id = key_index.and_then(|index| row.get(index)).and_then(|value| value.as_deref());
        html.push_str("\n\t<tr>");
        for (index, column) in &shown {
            let value = row.get(*index).and_then(|value| value.as_deref()).unwrap_or("");
            let text = match id {
                Some(id) if layout.is_linked(column) => format!(
                    r#"<a href="{FORM_PATH}?id={}">{}</a>"#,
                    escape_html(id),
                    escape_html(value)
                ),
                _ => escape_html(value),
            };
            html.push_str(&format!("\n\t\t<td>{text}</td>"));
        }
        html.push_str("\n\t</tr>");
    }
    html.push_str("\n\t</table>");

    html_shell(&format!("Facturas ({})", rows.len()), &html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::INVOICE_LISTING;
    use crate::services::field_codec::encode_fields;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn input_uses_exact_field_name() {
        let html = render_input(&FieldName::new("cliente_nombre"), "Unamente GRD, SL");
        assert_eq!(
            html,
            r#"Cliente_nombre <input type="text" name="cliente_nombre" id="cliente_nombre" value="Unamente GRD, SL" title="Cliente_nombre">"#
        );
    }

    #[test]
    fn input_value_is_escaped() {
        let html = render_input(&FieldName::new("descripcion"), r#""><script>"#);
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
    }

    #[test]
    fn inputs_are_joined_with_breaks() {
        let grupo = FieldName::new("grupo");
        let numero = FieldName::new("numero");
        let html = render_inputs([(&grupo, "combustible"), (&numero, "")]);
        assert_eq!(html.matches("<br>\n").count(), 1);
        assert!(html.starts_with("Grupo "));
    }

    #[test]
    fn form_carries_token_and_action() {
        let fields = [FieldName::new("grupo"), FieldName::new("numero")];
        let token = encode_fields(&fields, ' ');
        let html = render_invoice_form("", FormAction::Grabar, &token, None);

        assert!(html.contains(r#"<input type="hidden" name="__accion__" value="grabar"/>"#));
        assert!(html.contains(&format!(
            r#"<input type="hidden" name="__lista_campos__" value="{}"/>"#,
            token.as_str()
        )));
        assert!(!html.contains(RECORD_ID_FIELD));
    }

    #[test]
    fn edit_form_carries_record_id() {
        let token = encode_fields(&[FieldName::new("grupo")], ' ');
        let html = render_invoice_form("", FormAction::Modificar, &token, Some(12));

        assert!(html.contains(r#"value="modificar""#));
        assert!(html.contains(r#"<input type="hidden" name="__id__" value="12"/>"#));
    }

    #[test]
    fn field_list_shows_escaped_source() {
        let html = render_field_list(r#"Grupo <input type="text">"#);
        assert!(html.contains("Grupo &lt;input type=&quot;text&quot;&gt;"));
        assert!(html.contains(r#"Grupo <input type="text">"#));
    }

    #[test]
    fn listing_links_and_hides_keys() {
        let rows = vec![vec![
            Some("5".to_string()),
            None,
            Some("Unamente".to_string()),
            Some("Alameda".to_string()),
            Some("F-001".to_string()),
            Some("20240101 10:00:00".to_string()),
            Some("50".to_string()),
            Some("21".to_string()),
            Some("10.5".to_string()),
            Some("60.5".to_string()),
        ]];
        let html = render_listing(&INVOICE_LISTING, &rows, true);

        assert!(html.contains(r#"<a href="/facturas/form?id=5">F-001</a>"#));
        assert!(html.contains(r#"<a href="/facturas/form?id=5">60.5</a>"#));
        assert!(html.contains("<td>Unamente</td>"));
        assert!(!html.contains("<th>Id "));
        assert!(html.contains(r#"href="?c=numero&amp;o=ASC""#));
        assert!(!html.contains("?c=tipo_iva"));
    }

    #[test]
    fn listing_without_sort_links() {
        let html = render_listing(&INVOICE_LISTING, &[], false);
        assert!(!html.contains("?c="));
        assert!(html.contains("<th>Numero </th>"));
    }
}
