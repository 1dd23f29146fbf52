use crate::models::{normalize_name, ForcedPair};
use std::collections::HashSet;

/// Parse operator text into forced pairs, one `Name A, Name B` per line.
///
/// Lines that do not split into exactly two non-empty names are dropped
/// without error. Output order follows the accepted lines.
pub fn parse_forced_pairs(raw_text: &str) -> Vec<ForcedPair> {
    raw_text
        .lines()
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
            match tokens.as_slice() {
                [first, second] if !first.is_empty() && !second.is_empty() => {
                    Some(ForcedPair::new(*first, *second))
                }
                _ => {
                    if !line.trim().is_empty() {
                        tracing::debug!("Ignoring forced-pair line: {:?}", line);
                    }
                    None
                }
            }
        })
        .collect()
}

/// Normalized names of everyone named in a forced pair
pub fn reserved_names(pairs: &[ForcedPair]) -> HashSet<String> {
    pairs
        .iter()
        .flat_map(|pair| [normalize_name(&pair.first), normalize_name(&pair.second)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_malformed_lines() {
        let pairs = parse_forced_pairs("A, B\nC");
        assert_eq!(pairs, vec![ForcedPair::new("A", "B")]);
    }

    #[test]
    fn test_parse_trims_and_keeps_order() {
        let text = "  John Smith ,Jane Doe\r\n\nAga Karczewska,  Tom Carroll  \n";
        let pairs = parse_forced_pairs(text);

        assert_eq!(
            pairs,
            vec![
                ForcedPair::new("John Smith", "Jane Doe"),
                ForcedPair::new("Aga Karczewska", "Tom Carroll"),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_wrong_token_counts() {
        let text = "A, B, C\n, B\nA,\n,\nsolo";
        assert!(parse_forced_pairs(text).is_empty());
    }

    #[test]
    fn test_parse_is_repeatable() {
        let text = "A, B\nbad line\nC, D";
        assert_eq!(parse_forced_pairs(text), parse_forced_pairs(text));
    }

    #[test]
    fn test_reserved_names_normalized() {
        let pairs = vec![ForcedPair::new(" Jane ", "TOM"), ForcedPair::new("jane", "Ghost")];
        let reserved = reserved_names(&pairs);

        assert_eq!(reserved.len(), 3);
        assert!(reserved.contains("jane"));
        assert!(reserved.contains("tom"));
        assert!(reserved.contains("ghost"));
    }
}
