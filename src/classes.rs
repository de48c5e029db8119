/// Class names collected from `--duplicate`, `--reference` and `--ignore`.
///
/// Names are kept exactly as typed and in command-line order. A name may
/// show up in more than one set; the server decides what that means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationSet {
    pub to_duplicate: Vec<String>,
    pub to_reference: Vec<String>,
    pub to_ignore: Vec<String>,
}

impl ClassificationSet {
    pub fn from_tokens(duplicate: &[String], reference: &[String], ignore: &[String]) -> Self {
        Self {
            to_duplicate: flatten_classes(duplicate),
            to_reference: flatten_classes(reference),
            to_ignore: flatten_classes(ignore),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_duplicate.is_empty() && self.to_reference.is_empty() && self.to_ignore.is_empty()
    }
}

/// Splits every token on `,` and concatenates the pieces in order.
///
/// `tokens` holds the values of every occurrence of one flag. Empty pieces
/// (`"Foo,"`, `""`) are kept.
pub fn flatten_classes<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| token.as_ref().split(','))
        .map(str::to_owned)
        .collect()
}
