use std::ops::RangeInclusive;

/// Result of parsing a free-text choice string.
///
/// `picks` keeps input order and duplicates; callers decide how to order,
/// dedup and bound them. A single integer `n` is stored as `n..=n`. Ranges
/// are kept as bounds and never expanded here. `errors` holds one
/// human-readable line per rejected token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedChoice {
    pub picks: Vec<RangeInclusive<i64>>,
    pub errors: Vec<String>,
}

/// Parse one or more 1-based integers or inclusive `A:B` ranges separated by
/// whitespace and/or commas.
///
/// Never fails: bad tokens are skipped and reported in `errors`. A range whose
/// start is after its end yields nothing and is reported as well.
pub fn parse_choice(input: &str) -> ParsedChoice {
    let mut parsed = ParsedChoice::default();

    // Fast path for the common "just one number" answer.
    if let Ok(single) = input.trim().parse::<i64>() {
        parsed.picks.push(single..=single);
        return parsed;
    }

    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if let Ok(value) = token.parse::<i64>() {
            parsed.picks.push(value..=value);
            continue;
        }

        match parse_range(token) {
            Some((first, last)) if first <= last => parsed.picks.push(first..=last),
            Some(_) => parsed
                .errors
                .push(format!("Empty range (start is after end): {}", token)),
            None => parsed
                .errors
                .push(format!("Not an integer or range: {}", token)),
        }
    }
    parsed
}

fn parse_range(token: &str) -> Option<(i64, i64)> {
    let (first, last) = token.split_once(':')?;
    Some((first.parse().ok()?, last.parse().ok()?))
}
