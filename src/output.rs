use crate::types::CollectedRequest;

/// Serialize a [`CollectedRequest`] to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(request: &CollectedRequest, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(request).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(request).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render a [`CollectedRequest`] in a human-readable debug format.
pub fn format_debug(request: &CollectedRequest) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== Request Frame ===\n");
    out.push_str(&format!("Method:  {}\n", request.method));
    out.push_str(&format!("Target:  {}\n", request.target));
    out.push_str(&format!("Path:    {}\n", request.path));
    if !request.query.is_empty() {
        out.push_str(&format!("Query:   {}\n", request.query));
    }
    out.push_str(&format!("Version: {}\n", request.version));

    out.push_str(&format!("\n--- Headers ({}) ---\n", request.headers.len()));
    for header in &request.headers {
        out.push_str(&format!("  {}: {}\n", header.name, header.value));
    }

    out.push_str("=====================\n");
    out
}

/// Render only the request line and headers, wire-style.
pub fn format_headers_only(request: &CollectedRequest) -> String {
    let mut out = String::with_capacity(64 + request.headers.len() * 40);

    out.push_str(&format!(
        "{} {} {}\n",
        request.method, request.target, request.version
    ));

    for header in &request.headers {
        out.push_str(&format!("{}: {}\n", header.name, header.value));
    }

    out
}
