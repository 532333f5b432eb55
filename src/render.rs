use crate::models::{Credito, SearchMode};
use crate::view::SearchView;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

const MISSING: &str = "-";

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `R$ 1500.75`
pub fn format_money(value: Option<&BigDecimal>) -> String {
    value
        .map(|v| format!("R$ {}", v.with_scale_round(2, bigdecimal::RoundingMode::HalfUp)))
        .unwrap_or_else(|| MISSING.to_string())
}

/// `5.00%`
pub fn format_rate(value: Option<&BigDecimal>) -> String {
    value
        .map(|v| format!("{}%", v.with_scale_round(2, bigdecimal::RoundingMode::HalfUp)))
        .unwrap_or_else(|| MISSING.to_string())
}

/// `25/02/2024`
pub fn format_date(value: Option<&NaiveDate>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn text_or_missing(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| MISSING.to_string())
}

fn render_row(out: &mut String, credito: &Credito) {
    let cells = [
        text_or_missing(Some(&credito.numero_credito)),
        text_or_missing(Some(&credito.numero_nfse)),
        format_date(credito.data_constituicao.as_ref()),
        format_money(credito.valor_issqn.as_ref()),
        text_or_missing(credito.tipo_credito.as_deref()),
        text_or_missing(credito.simples_nacional.as_deref()),
        format_rate(credito.aliquota.as_ref()),
        format_money(credito.valor_faturado.as_ref()),
        format_money(credito.valor_deducao.as_ref()),
        format_money(credito.base_calculo.as_ref()),
    ];

    out.push_str("<tr>");
    for cell in cells {
        out.push_str(&format!("<td>{}</td>", cell));
    }
    out.push_str("</tr>\n");
}

fn render_mode_option(out: &mut String, mode: SearchMode, selected: SearchMode) {
    out.push_str(&format!(
        "<option value=\"{}\"{}>{}</option>\n",
        mode.as_str(),
        if mode == selected { " selected" } else { "" },
        mode.label()
    ));
}

/// Renders the full search page for the current view state.
pub fn render_page(view: &SearchView) -> String {
    let mut body = String::new();

    body.push_str(
        r#"<form method="post" action="/buscar">
<label for="tipo">Buscar por</label>
<select id="tipo" name="tipo">
"#,
    );
    render_mode_option(&mut body, SearchMode::Nfse, view.search_mode);
    render_mode_option(&mut body, SearchMode::Credito, view.search_mode);
    body.push_str(&format!(
        r#"</select>
<input type="text" id="termo" name="termo" value="{}" placeholder="Digite o número">
<button type="submit"{}>Buscar</button>
<button type="submit" formaction="/limpar">Limpar</button>
</form>
"#,
        escape_html(&view.query_text),
        if view.is_loading { " disabled" } else { "" }
    ));

    if view.is_loading {
        body.push_str("<p class=\"loading\">Buscando...</p>\n");
    }

    if !view.error_message.is_empty() {
        body.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(&view.error_message)
        ));
    }

    if !view.results.is_empty() {
        body.push_str(
            "<table>\n<thead><tr>\
<th>Número do Crédito</th><th>Número da NFS-e</th><th>Data da Constituição</th>\
<th>Valor do ISSQN</th><th>Tipo do Crédito</th><th>Simples Nacional</th>\
<th>Alíquota</th><th>Valor Faturado</th><th>Valor da Dedução</th><th>Base de Cálculo</th>\
</tr></thead>\n<tbody>\n",
        );
        for credito in &view.results {
            render_row(&mut body, credito);
        }
        body.push_str("</tbody>\n</table>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Consulta de Créditos</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        table {{ border-collapse: collapse; margin-top: 1rem; }}
        th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; }}
        .error {{ color: #b00020; }}
    </style>
</head>
<body>
<h1>Consulta de Créditos</h1>
{}</body>
</html>
"#,
        body
    )
}
