/// Wraps a bare base64 key body into a PEM block with the given label.
///
/// Keys are usually handed over by the gateways as a single base64 line without
/// armor. Text already containing a PEM header is returned trimmed, untouched.
pub(crate) fn normalize(key: &str, label: &str) -> String {
    let key = key.trim();
    if key.contains("-----BEGIN") {
        return key.to_string();
    }

    let body: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    let lines = body
        .as_bytes()
        .chunks(64)
        // Chunks of a filtered base64 string are always valid UTF-8
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    format!("-----BEGIN {label}-----\n{lines}\n-----END {label}-----\n")
}

pub(crate) fn rsa_private_key(key: &str) -> String {
    normalize(key, "RSA PRIVATE KEY")
}

pub(crate) fn public_key(key: &str) -> String {
    normalize(key, "PUBLIC KEY")
}
