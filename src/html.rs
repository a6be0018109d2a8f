use crate::table::{Row, Table};

/// Renders `table` as a sortable html table for the page script.
///
/// A table with a total row uses the single table form: `id="mainTable"`,
/// rows directly under the table and `sortTable(<column>)` on the headers.
/// Without a total row the data rows go into a `<tbody>` and the headers call
/// `sortTable('<id>', <column>)`. Data cells carry their sort key in
/// `data-sort`, the table element carries the sort state in
/// `data-sort-column` / `data-sort-direction`.
pub fn render_html(table: &Table) -> String {
    let with_total = table.layout().total_row;
    let id = if with_total {
        "mainTable".to_string()
    } else {
        table_id(&table.name)
    };

    let mut out = format!("<table id=\"{}\"", escape(&id));
    if let (Some(column), Some(direction)) = table.sort_state() {
        out.push_str(&format!(
            " data-sort-column=\"{column}\" data-sort-direction=\"{}\"",
            direction.code()
        ));
    }
    out.push_str(">\n");

    if !with_total {
        out.push_str("<thead>\n");
    }
    out.push_str("<tr>");
    for (idx, name) in table.header().iter().enumerate() {
        let call = if with_total {
            format!("sortTable({idx})")
        } else {
            format!("sortTable('{id}', {idx})")
        };
        out.push_str(&format!("<th onclick=\"{call}\">{}</th>", escape(name)));
    }
    out.push_str("</tr>\n");
    if !with_total {
        out.push_str("</thead>\n<tbody>\n");
    }

    for row in table.data_rows() {
        write_row(&mut out, row);
    }
    if let Some(total) = table.total_row() {
        write_row(&mut out, total);
    }
    if !with_total {
        out.push_str("</tbody>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Element id made of the table name, letters and digits only.
fn table_id(name: &str) -> String {
    let id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() { "table".to_string() } else { id }
}

fn write_row(out: &mut String, row: &Row) {
    out.push_str("<tr>");
    for cell in row {
        match &cell.sort_key {
            Some(key) => out.push_str(&format!(
                "<td data-sort=\"{}\">{}</td>",
                escape(key),
                escape(&cell.display)
            )),
            None => out.push_str(&format!("<td>{}</td>", escape(&cell.display))),
        }
    }
    out.push_str("</tr>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
