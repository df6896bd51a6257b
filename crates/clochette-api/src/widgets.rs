//! Small HTML building blocks shared by the inventory and account pages

use clochette_utils::{escape_html, html_attr};

/// Labelled text input
pub fn input(name: &str, label: &str, value: &str, kind: &str) -> String {
    format!(
        r#"<label class='block'>
            <span class='text-sm text-gray-600'>{}</span>
            <input type='{}' name='{}' value='{}' class='mt-1 w-full px-3 py-2 border rounded-lg'>
        </label>"#,
        label,
        kind,
        name,
        html_attr(value)
    )
}

/// Labelled select; `options` are `(value, label)` pairs
pub fn select(name: &str, label: &str, options: &[(String, String)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| {
            format!(
                "<option value='{}'{}>{}</option>",
                html_attr(value),
                if value == selected { " selected" } else { "" },
                escape_html(text)
            )
        })
        .collect();
    format!(
        r#"<label class='block'>
            <span class='text-sm text-gray-600'>{}</span>
            <select name='{}' class='mt-1 w-full px-3 py-2 border rounded-lg bg-white'>{}</select>
        </label>"#,
        label, name, options
    )
}

pub fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label class='flex items-center gap-2'>
            <input type='checkbox' name='{}'{} class='rounded'>
            <span class='text-sm text-gray-600'>{}</span>
        </label>"#,
        name,
        if checked { " checked" } else { "" },
        label
    )
}

/// Form posting to `action` and swapping the answer into `target`
pub fn form(action: &str, target: &str, fields: &str, submit: &str) -> String {
    format!(
        r#"<form hx-post='{}' hx-target='{}' hx-swap='innerHTML' class='space-y-3'>
            {}
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>{}</button>
        </form>"#,
        action, target, fields, submit
    )
}

/// Modal dialog rendered into `#modal`
pub fn modal(title: &str, body: &str) -> String {
    format!(
        r#"<div class='fixed inset-0 bg-black/40 flex items-center justify-center z-40'>
            <div class='bg-white rounded-xl shadow-lg p-6 w-full max-w-md'>
                <div class='flex items-center justify-between mb-4'>
                    <h3 class='text-lg font-semibold'>{}</h3>
                    <button onclick="document.getElementById('modal').innerHTML=''" class='text-gray-400 hover:text-gray-600'>×</button>
                </div>
                {}
            </div>
        </div>"#,
        escape_html(title),
        body
    )
}

/// Out-of-band swap emptying `#modal`
pub fn close_modal() -> &'static str {
    "<div id='modal' hx-swap-oob='innerHTML'></div>"
}

/// Edit and delete buttons of a table row
pub fn row_actions(base: &str, id: i64, target: &str, confirm: &str) -> String {
    format!(
        r#"<div class='flex gap-2 justify-end'>
            <button hx-get='{base}/{id}/edit' hx-target='#modal' class='px-2 py-1 text-sm text-indigo-600 hover:underline'>Modifier</button>
            <button hx-delete='{base}/{id}' hx-target='{target}' hx-confirm='{confirm}' class='px-2 py-1 text-sm text-red-600 hover:underline'>Supprimer</button>
        </div>"#,
        base = base,
        id = id,
        target = target,
        confirm = html_attr(confirm)
    )
}

/// Table with a header row; `rows` is pre-rendered `<tr>` markup
pub fn table(headers: &[&str], rows: &str, empty: &str) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th class='px-4 py-2 text-left text-sm font-medium text-gray-500'>{}</th>", h))
        .collect();
    let body = if rows.is_empty() {
        format!(
            "<tr><td colspan='{}' class='px-4 py-8 text-center text-gray-500'>{}</td></tr>",
            headers.len(),
            empty
        )
    } else {
        rows.to_string()
    };
    format!(
        "<table class='w-full'><thead class='border-b'><tr>{}</tr></thead><tbody class='divide-y'>{}</tbody></table>",
        head, body
    )
}

/// Header of a management page with its creation form
pub fn section(title: &str, form_title: &str, create_form: &str, list_id: &str, list_url: &str) -> String {
    format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>{}</h2></div>
        <div class='grid grid-cols-1 lg:grid-cols-3 gap-6'>
            <div class='lg:col-span-2 bg-white rounded-xl shadow-sm p-6'>
                <div id='{}' hx-get='{}' hx-trigger='load'><p class='text-gray-500 text-center'>Chargement...</p></div>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold mb-4'>{}</h3>
                {}
            </div>
        </div>"#,
        title, list_id, list_url, form_title, create_form
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_escapes_value() {
        let html = input("name", "Nom", "L'Abbaye", "text");
        assert!(html.contains("value='L&#39;Abbaye'"));
    }

    #[test]
    fn test_select_marks_selected_option() {
        let options = vec![
            ("cash".to_string(), "Espèces".to_string()),
            ("card".to_string(), "Carte".to_string()),
        ];
        let html = select("payment_method", "Paiement", &options, "card");
        assert!(html.contains("<option value='card' selected>Carte</option>"));
        assert!(html.contains("<option value='cash'>Espèces</option>"));
    }

    #[test]
    fn test_empty_table_spans_all_columns() {
        let html = table(&["Nom", "Prix"], "", "Aucune boisson");
        assert!(html.contains("colspan='2'"));
        assert!(html.contains("Aucune boisson"));
    }
}
