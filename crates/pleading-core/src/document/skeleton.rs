//! HTML skeleton wrapped around every persisted document.

use crate::preview::PreviewDocument;

pub const LEGAL_DOCUMENT_OPEN: &str = "<div class=\"legal-document\">";
const DIV_CLOSE: &str = "</div>";

const STYLE: &str = r#"    body { font-family: 'Times New Roman', serif; margin: 1in; line-height: 1.5; }
    .highlight { background-color: #fef08a; }
    .legal-document {
      font-family: Times New Roman, serif;
      line-height: 1.5;
      margin: 1in;
    }
    .header {
      text-align: center;
      margin-bottom: 24px;
    }
    .court-info {
      text-align: center;
      margin-bottom: 24px;
      text-transform: uppercase;
    }
    .case-info {
      text-align: center;
      margin-bottom: 24px;
    }
    .section-title {
      text-align: center;
      text-transform: uppercase;
      font-weight: bold;
      margin: 24px 0;
    }
    .paragraph {
      text-indent: 0.5in;
      margin-bottom: 12px;
    }
    .numbered-paragraph {
      margin-bottom: 12px;
    }
    .signature-block {
      margin-top: 48px;
    }
"#;

/// Embeds `body` in the full standalone page.
pub fn wrap_page(client_name: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>Legal Complaint - {client}</title>\n  <style>\n{style}  </style>\n</head>\n<body>\n  {body}\n</body>\n</html>",
        client = client_name,
        style = STYLE,
        body = body,
    )
}

/// Wraps edited content in the legal-document container.
pub fn wrap_legal_document(content: &str) -> String {
    format!("{}\n    {}\n  {}", LEGAL_DOCUMENT_OPEN, content, DIV_CLOSE)
}

/// Renders preview sections as the legal-document container.
pub fn render_preview(preview: &PreviewDocument) -> String {
    let mut html = String::from(LEGAL_DOCUMENT_OPEN);
    for section in &preview.content {
        if !section.title.is_empty() {
            html.push_str(&format!(
                "<div class=\"section-title\">{}</div>\n",
                section.title
            ));
        }
        html.push_str(&format!(
            "<div class=\"section-content\">{}</div>\n",
            section.content
        ));
    }
    html.push_str(DIV_CLOSE);
    html
}

/// The legal-document container through the last closing div, or the
/// whole input when there is no container.
pub fn extract_legal_document(html: &str) -> &str {
    match (html.find(LEGAL_DOCUMENT_OPEN), html.rfind(DIV_CLOSE)) {
        (Some(start), Some(end)) if end > start => &html[start..end + DIV_CLOSE.len()],
        _ => html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::build_preview;

    #[test]
    fn page_carries_title_and_body() {
        let page = wrap_page("Eman Youssef", "<p>x</p>");
        assert!(page.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(page.contains("<title>Legal Complaint - Eman Youssef</title>"));
        assert!(page.contains("<body>\n  <p>x</p>\n</body>"));
        assert!(page.contains(".signature-block"));
    }

    #[test]
    fn extraction_spans_first_container_to_last_div() {
        let page = wrap_page("X", &wrap_legal_document("<div>a</div>"));
        let extracted = extract_legal_document(&page);
        assert!(extracted.starts_with(LEGAL_DOCUMENT_OPEN));
        assert!(extracted.ends_with("</div>"));
        assert!(extracted.contains("<div>a</div>"));
        assert!(!extracted.contains("</body>"));
    }

    #[test]
    fn extraction_without_container_returns_input() {
        assert_eq!(extract_legal_document("<p>plain</p>"), "<p>plain</p>");
    }

    #[test]
    fn preview_renders_every_section() {
        let html = render_preview(&build_preview(&[]));
        assert_eq!(html.matches("<div class=\"section-title\">").count(), 9);
        assert_eq!(html.matches("<div class=\"section-content\">").count(), 9);
        assert!(html.starts_with(LEGAL_DOCUMENT_OPEN));
    }
}
