use serde_json::Value;

/// What a dataset record offers for answer extraction.
///
/// Expected line shape:
/// ```json
/// {"choices":[{"turns":["...", "..."]}, {"turns":["ignored"]}], "question_id": 1}
/// ```
///
/// Only `choices[0].turns` is consulted. Anything that does not match the
/// shape degrades to an empty scan instead of an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnScan<'a> {
    /// `choices` missing, not an array, or empty.
    NoChoices,
    /// First choice present but without a `turns` array.
    NoTurns,
    Turns(&'a [Value]),
}

impl<'a> TurnScan<'a> {
    /// Turn texts in order, skipping entries that are not strings.
    pub fn texts(&self) -> impl Iterator<Item = &'a str> + 'a {
        let turns: &'a [Value] = match self {
            TurnScan::Turns(t) => *t,
            _ => &[],
        };
        turns.iter().filter_map(Value::as_str)
    }

    /// Number of entries in `turns`, strings or not.
    pub fn len(&self) -> usize {
        match self {
            TurnScan::Turns(t) => t.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve `choices[0].turns` on a parsed record.
pub fn first_choice_turns(record: &Value) -> TurnScan<'_> {
    let first = match record
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
    {
        Some(choice) => choice,
        None => return TurnScan::NoChoices,
    };

    match first.get("turns").and_then(|t| t.as_array()) {
        Some(turns) => TurnScan::Turns(turns.as_slice()),
        None => TurnScan::NoTurns,
    }
}
