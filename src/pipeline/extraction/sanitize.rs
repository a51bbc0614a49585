/// Clean text coming out of a PDF text layer or an OCR engine.
///
/// Drops control and private-use characters, normalizes line endings and
/// non-breaking spaces, trims each line and removes blank lines. Lab
/// punctuation (`.`, `-`, `/`, `(`, `)`, `%`, `:` and unit symbols) survives.
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter_map(clean_char)
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_char(c: char) -> Option<char> {
    match c {
        '\n' | '\t' => Some(c),
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
        // Soft hyphen and zero-width marks show up in PDF text layers
        '\u{00AD}' | '\u{200B}'..='\u{200D}' | '\u{FEFF}' => None,
        '\u{E000}'..='\u{F8FF}' => None,
        c if c.is_control() => None,
        c => Some(c),
    }
}
