/// A free-text relationship annotation of the form `Name (relation)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Annotation<'a> {
    pub name: &'a str,
    pub label: &'a str,
}

fn is_open_paren(c: char) -> bool {
    c == '(' || c == '（'
}

/// Splits `Name (relation)` into its parts. Both ASCII and full-width
/// parentheses are accepted; the name ends at the first opening parenthesis.
pub fn parse_annotation(raw: &str) -> Option<Annotation<'_>> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_suffix(')')
        .or_else(|| trimmed.strip_suffix('）'))?;

    let open = body.find(is_open_paren)?;
    let paren_len = body[open..].chars().next().map(char::len_utf8)?;

    let name = body[..open].trim();
    let label = body[open + paren_len..].trim();
    if name.is_empty() || label.is_empty() {
        return None;
    }

    Some(Annotation { name, label })
}
