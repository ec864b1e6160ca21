//! Generic tool page.
//!
//! A single page template serves every tool: title, description, a JSON
//! input box and a button that posts to `/{slug}/execute`.

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
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

/// Render the page for a tool.
pub fn render_tool_page(name: &str, description: &str, slug: &str) -> String {
    let name = escape_html(name);
    let description = escape_html(description);
    let slug = escape_html(slug);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{name}</title>
</head>
<body>
<main>
<h1>{name}</h1>
<p>{description}</p>
<textarea id="input" rows="10" cols="80">{{}}</textarea>
<p><button id="execute">Execute</button></p>
<pre id="output"></pre>
</main>
<script>
document.getElementById("execute").addEventListener("click", async () => {{
  const output = document.getElementById("output");
  try {{
    const response = await fetch("/{slug}/execute", {{
      method: "POST",
      headers: {{ "Content-Type": "application/json" }},
      body: document.getElementById("input").value
    }});
    output.textContent = JSON.stringify(await response.json(), null, 2);
  }} catch (err) {{
    output.textContent = String(err);
  }}
}});
</script>
</body>
</html>
"#
    )
}
