use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use profile_registration::security::StrengthResult;

/// Read a line of input from the terminal
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    // Only the line ending is dropped; surrounding spaces are part of the value
    Ok(input.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Read a hidden line of input from the terminal (like a password)
pub fn read_password(prompt: &str) -> Result<String> {
    // Input is echoed; swap in a tty reader if that matters
    read_line(prompt)
}

/// Use the flag value or ask for it
pub fn value_or_prompt(value: Option<&String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => read_line(prompt),
    }
}

/// Declared media type of a photo, from its file extension
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Render the strength meter as a one-line bar
pub fn display_strength(result: &StrengthResult) {
    let filled = usize::from(result.score) + 1;
    let bar: String = "█".repeat(filled) + &"░".repeat(5 - filled);
    println!("{} {} ({})", bar, result.label, result.color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("me.png", "image/png")]
    #[test_case("ME.JPG", "image/jpeg")]
    #[test_case("photo.jpeg", "image/jpeg")]
    #[test_case("anim.gif", "image/gif")]
    #[test_case("resume.pdf", "application/octet-stream")]
    #[test_case("noext", "application/octet-stream")]
    fn test_media_type_for(path: &str, expected: &str) {
        assert_eq!(media_type_for(Path::new(path)), expected);
    }
}
