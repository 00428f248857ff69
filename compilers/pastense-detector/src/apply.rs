use pastense_protocol::Correction;

/// Copy the leading capital of `matched` onto `replacement`.
pub fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if starts_upper && first.is_lowercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}

/// Apply every correction at or above `threshold` to `sentence`.
///
/// Longer matches are chosen first; a correction overlapping an already
/// chosen one is skipped. Chosen corrections are spliced right to left so
/// that offsets into the original sentence stay valid. Marks `applied`.
pub fn apply_corrections(sentence: &str, corrections: &mut [Correction], threshold: f32) -> String {
    let mut candidates: Vec<usize> = (0..corrections.len())
        .filter(|&i| corrections[i].confidence >= threshold)
        .collect();
    candidates.sort_by(|&a, &b| {
        corrections[b]
            .original
            .len()
            .cmp(&corrections[a].original.len())
            .then(corrections[a].position.cmp(&corrections[b].position))
    });

    let mut chosen: Vec<usize> = Vec::new();
    for i in candidates {
        if chosen.iter().all(|&c| !corrections[c].overlaps(&corrections[i])) {
            chosen.push(i);
        }
    }

    chosen.sort_by(|&a, &b| corrections[b].position.cmp(&corrections[a].position));

    let mut out = sentence.to_string();
    for i in chosen {
        let fix = &mut corrections[i];
        let end = fix.end();
        if end > out.len() || out.get(fix.position..end) != Some(fix.original.as_str()) {
            continue;
        }
        out.replace_range(fix.position..end, &fix.replacement);
        fix.applied = true;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastense_protocol::ErrorKind;

    fn fix(original: &str, replacement: &str, position: usize, confidence: f32) -> Correction {
        Correction {
            kind: ErrorKind::Misspelling,
            original: original.into(),
            replacement: replacement.into(),
            position,
            confidence,
            applied: false,
        }
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("Goed", "went"), "Went");
        assert_eq!(match_case("goed", "went"), "went");
        assert_eq!(match_case("I were", "I was"), "I was");
        assert_eq!(match_case("X", ""), "");
    }

    #[test]
    fn test_longest_match_wins_overlap() {
        let sentence = "I were walk home";
        let mut fixes = vec![
            fix("I were", "I was", 0, 0.95),
            fix("were walk", "were walking", 2, 0.9),
        ];

        let out = apply_corrections(sentence, &mut fixes, 0.9);

        assert_eq!(out, "I were walking home");
        assert!(!fixes[0].applied);
        assert!(fixes[1].applied);
    }

    #[test]
    fn test_offsets_stay_valid_right_to_left() {
        // A shorter replacement early in the sentence must not shift a later one
        let sentence = "she studing and writting";
        let mut fixes = vec![
            fix("studing", "studying", 4, 0.95),
            fix("writting", "writing", 16, 0.95),
        ];
        let out = apply_corrections(sentence, &mut fixes, 0.9);
        assert_eq!(out, "she studying and writing");
        assert!(fixes.iter().all(|f| f.applied));
    }

    #[test]
    fn test_low_confidence_is_reported_not_applied() {
        let sentence = "I was walked";
        let mut fixes = vec![fix("was walked", "was walking", 2, 0.7)];
        assert_eq!(apply_corrections(sentence, &mut fixes, 0.9), sentence);
        assert!(!fixes[0].applied);
    }
}
