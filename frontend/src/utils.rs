use web_sys::window;

/// Get the base HTTP URL (e.g., "http://localhost:3000" or "https://myapp.com")
pub fn get_base_url() -> String {
    let window = window().expect("no global window");
    let location = window.location();

    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location
        .host()
        .unwrap_or_else(|_| "localhost:3000".to_string());

    format!("{}//{}", protocol, host)
}

/// Build a full API URL from a path (e.g., "/api/history" -> "http://localhost:3000/api/history")
pub fn api_url(path: &str) -> String {
    format!("{}{}", get_base_url(), path)
}

/// Build a full API URL with a percent-encoded query string
pub fn api_url_with_query(path: &str, params: &[(&str, &str)]) -> String {
    format!("{}?{}", api_url(path), query_string(params))
}

/// Percent-encode `params` into a query string. Keys are taken verbatim;
/// values go through `encodeURIComponent`.
pub fn query_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!("{}={}", key, String::from(js_sys::encode_uri_component(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Truncate text to at most `max_lines` lines for list previews
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max_lines {
        text.to_string()
    } else {
        format!("{}\n...", lines[..max_lines].join("\n"))
    }
}
