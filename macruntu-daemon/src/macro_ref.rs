//! Macro references from the command line and URIs
//!
//! Macros are addressed by 1-based position. Accepted forms:
//! `--macro N`, `--macro=N`, `macruntu://macro/N`, `macro:N`, and a bare `N`
//! where a single reference is expected.

const URI_PREFIX: &str = "macruntu://macro/";

/// Parse a 1-based macro index; zero, negative or non-numeric is `None`
pub fn parse_index(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|index| *index >= 1)
}

/// Scan launcher arguments for a macro reference.
///
/// Prefixed forms are taken in argument order. A separate `--macro N` pair is
/// only considered after that.
pub fn macro_from_args<S: AsRef<str>>(args: &[S]) -> Option<usize> {
    for arg in args.iter().map(AsRef::as_ref) {
        if let Some(value) = arg.strip_prefix("--macro=") {
            return parse_index(value);
        }
        if arg == "--macro" {
            continue;
        }
        if arg.starts_with(URI_PREFIX) {
            return arg.rsplit('/').next().and_then(parse_index);
        }
        if let Some(value) = arg.strip_prefix("macro:") {
            return parse_index(value);
        }
    }

    let position = args.iter().position(|arg| arg.as_ref() == "--macro")?;
    args.get(position + 1).and_then(|value| parse_index(value.as_ref()))
}

/// Parse one reference in any accepted form, including a bare number
pub fn parse_reference(reference: &str) -> Option<usize> {
    let reference = reference.trim();
    parse_index(reference).or_else(|| macro_from_args(&[reference]))
}

/// URI that launches macro `index`
pub fn macro_uri(index: usize) -> String {
    format!("{}{}", URI_PREFIX, index)
}
