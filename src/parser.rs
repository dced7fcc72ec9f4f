//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//!
//! A description is a CSV file. The first seven records are headers (name, states, input
//! alphabet, tape alphabet, start, accept, reject); every following record is a transition
//! `state, read, next_state, write, direction`. Blank lines are ignored and fields are trimmed.

use crate::{
    machine::{MachineDescription, TransitionTable},
    types::{Direction, Header, NtmError, Transition},
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the description record grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses the given input string into a `MachineDescription`.
///
/// # Returns
///
/// * `Ok(MachineDescription)` if the input is well formed.
/// * `Err(NtmError::ParseError)` if the record layer cannot be read (e.g. an unterminated quote).
/// * Any other malformed-description variant naming the missing header or the offending
///   transition record.
pub fn parse(input: &str) -> Result<MachineDescription, NtmError> {
    let root = DescriptionParser::parse(Rule::description, input)
        .map_err(|e| NtmError::ParseError(e.into()))?
        .next()
        .ok_or(NtmError::MissingHeader(Header::Name))?;

    let mut records = root
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::record)
        .map(parse_record)
        .filter(|record| !record.is_blank());

    let name = next_header(&mut records, Header::Name)?.first().to_string();
    let states = next_header(&mut records, Header::States)?.into_list();
    let input_alphabet = next_header(&mut records, Header::InputAlphabet)?.into_list();
    let tape_alphabet = next_header(&mut records, Header::TapeAlphabet)?.into_list();
    let start_state = parse_state(&mut records, Header::StartState)?;
    let accept_state = parse_state(&mut records, Header::AcceptState)?;
    let reject_state = parse_state(&mut records, Header::RejectState)?;

    let mut transitions = TransitionTable::new();
    for record in records {
        let (state, read, transition) = parse_transition(record)?;
        transitions.add(state, read, transition);
    }

    let machine = MachineDescription {
        name,
        states,
        input_alphabet,
        tape_alphabet,
        start_state,
        accept_state,
        reject_state,
        transitions,
    };

    tracing::debug!(
        name = %machine.name,
        transitions = machine.transition_count(),
        deterministic = machine.is_deterministic(),
        "Parsed machine description"
    );

    Ok(machine)
}

/// One line of the description with its fields already unquoted and trimmed.
struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Record {
    fn is_blank(&self) -> bool {
        matches!(self.fields.as_slice(), [field] if field.is_empty())
    }

    fn first(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Header lists drop empty cells, so a trailing comma does not declare an empty state.
    fn into_list(self) -> Vec<String> {
        self.fields
            .into_iter()
            .filter(|field| !field.is_empty())
            .collect()
    }
}

/// Converts a `Pair<Rule::record>` into a `Record`.
fn parse_record(pair: Pair<Rule>) -> Record {
    let (line, _) = pair.as_span().start_pos().line_col();
    let fields = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::field)
        .map(parse_field)
        .collect();

    Record { line, fields }
}

/// Extracts the text of a `Pair<Rule::field>`, unescaping quoted fields.
fn parse_field(pair: Pair<Rule>) -> String {
    // Rule: field > (quoted > quoted_text | bare)
    match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::quoted => inner
            .into_inner()
            .next()
            .map(|text| text.as_str().replace("\"\"", "\""))
            .unwrap_or_default(),
        Some(inner) => inner.as_str().trim().to_string(),
        None => String::new(),
    }
}

/// Takes the next record, failing with `MissingHeader` when the input ran out.
fn next_header(
    records: &mut impl Iterator<Item = Record>,
    header: Header,
) -> Result<Record, NtmError> {
    records.next().ok_or(NtmError::MissingHeader(header))
}

/// Reads a single state name from a start/accept/reject header.
fn parse_state(
    records: &mut impl Iterator<Item = Record>,
    header: Header,
) -> Result<String, NtmError> {
    let record = next_header(records, header)?;
    match record.first() {
        "" => Err(NtmError::EmptyHeader {
            line: record.line,
            header,
        }),
        state => Ok(state.to_string()),
    }
}

/// Parses a transition record `state, read, next_state, write, direction`.
fn parse_transition(record: Record) -> Result<(String, char, Transition), NtmError> {
    let line = record.line;
    let [state, read, next_state, write, direction]: [String; 5] = record
        .fields
        .try_into()
        .map_err(|fields: Vec<String>| NtmError::TransitionArity {
            line,
            found: fields.len(),
        })?;

    let read = parse_symbol(&read, line)?;
    let write = parse_symbol(&write, line)?;
    let direction = parse_direction(&direction, line)?;

    Ok((state, read, Transition::new(next_state, write, direction)))
}

/// Parses a tape symbol, which must be exactly one character.
fn parse_symbol(input: &str, line: usize) -> Result<char, NtmError> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(NtmError::InvalidSymbol {
            line,
            symbol: input.to_string(),
        }),
    }
}

/// Parses a direction: `L` for Left, `R` for Right.
fn parse_direction(input: &str, line: usize) -> Result<Direction, NtmError> {
    match input {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        _ => Err(NtmError::InvalidDirection {
            line,
            direction: input.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BLANK_SYMBOL;

    const HEADER: &str = "Test\nq0,qA,qR\na\na,_\nq0\nqA\nqR\n";

    #[test]
    fn test_parse_simple_machine() {
        let input = r#"A plus
q1,q2,qacc,qrej
a
a,_
q1
qacc
qrej
q1,a,q2,a,R
q2,a,q2,a,R
q2,_,qacc,_,R
"#;

        let machine = parse(input).unwrap();
        assert_eq!(machine.name, "A plus");
        assert_eq!(machine.states, vec!["q1", "q2", "qacc", "qrej"]);
        assert_eq!(machine.input_alphabet, vec!["a"]);
        assert_eq!(machine.tape_alphabet, vec!["a", "_"]);
        assert_eq!(machine.start_state, "q1");
        assert_eq!(machine.accept_state, "qacc");
        assert_eq!(machine.reject_state, "qrej");
        assert_eq!(machine.transition_count(), 3);
        assert_eq!(
            machine.transitions("q2", BLANK_SYMBOL).unwrap(),
            &[Transition::new("qacc", '_', Direction::Right)]
        );
    }

    #[test]
    fn test_parse_nondeterministic_records_keep_order() {
        let input = format!("{HEADER}q0,a,q1,a,R\nq0,a,q2,b,L\nq0,a,q0,a,R\n");

        let machine = parse(&input).unwrap();
        let transitions = machine.transitions("q0", 'a').unwrap();
        let next: Vec<_> = transitions.iter().map(|t| t.next_state.as_str()).collect();

        assert_eq!(next, vec!["q1", "q2", "q0"]);
        assert_eq!(transitions[1].write, 'b');
        assert_eq!(transitions[1].direction, Direction::Left);
        assert!(!machine.is_deterministic());
    }

    #[test]
    fn test_parse_header_only() {
        let machine = parse(HEADER).unwrap();
        assert!(machine.transitions.is_empty());
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let machine = parse("Test\nq0\na\na\nq0\nqA\nqR\nq0,a,qA,a,R").unwrap();
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let input = "\nTest\n q0 , qA ,qR\r\na\n\na\nq0\n  qA\nqR\n\n q0 , a , qA , a , R \n\n";

        let machine = parse(input).unwrap();
        assert_eq!(machine.states, vec!["q0", "qA", "qR"]);
        assert_eq!(machine.accept_state, "qA");
        assert_eq!(
            machine.transitions("q0", 'a').unwrap()[0],
            Transition::new("qA", 'a', Direction::Right)
        );
    }

    #[test]
    fn test_parse_quoted_fields() {
        let input = format!("{HEADER}q0,\",\",q0,\"\"\"\",R\n");

        let machine = parse(&input).unwrap();
        let transition = &machine.transitions("q0", ',').unwrap()[0];
        assert_eq!(transition.write, '"');
    }

    #[test]
    fn test_parse_undeclared_states_are_accepted() {
        let input = format!("{HEADER}q0,a,somewhere,a,R\n");

        let machine = parse(&input).unwrap();
        assert_eq!(machine.transitions("q0", 'a').unwrap()[0].next_state, "somewhere");
    }

    #[test]
    fn test_parse_empty_input() {
        let error = parse("").unwrap_err();
        assert_eq!(error, NtmError::MissingHeader(Header::Name));
    }

    #[test]
    fn test_parse_missing_reject_state() {
        let error = parse("Test\nq0,qA,qR\na\na\nq0\nqA\n").unwrap_err();

        assert_eq!(error, NtmError::MissingHeader(Header::RejectState));
        assert!(error.is_malformed());
        assert_eq!(
            error.to_string(),
            "Malformed description: missing reject state record"
        );
    }

    #[test]
    fn test_parse_empty_start_state() {
        let error = parse("Test\nq0,qA,qR\na\na\n,\nqA\nqR\n").unwrap_err();
        assert_eq!(
            error,
            NtmError::EmptyHeader {
                line: 5,
                header: Header::StartState
            }
        );
    }

    #[test]
    fn test_parse_wrong_arity() {
        let input = format!("{HEADER}q0,a,qA,a,R\nq0,b,qA,R\n");

        let error = parse(&input).unwrap_err();
        assert_eq!(error, NtmError::TransitionArity { line: 9, found: 4 });
        assert!(error.to_string().contains("line 9"));
    }

    #[test]
    fn test_parse_too_many_fields() {
        let input = format!("{HEADER}q0,a,qA,a,R,extra\n");

        let error = parse(&input).unwrap_err();
        assert_eq!(error, NtmError::TransitionArity { line: 8, found: 6 });
    }

    #[test]
    fn test_parse_unsupported_direction() {
        let input = format!("{HEADER}q0,a,qA,a,S\n");

        let error = parse(&input).unwrap_err();
        assert_eq!(
            error,
            NtmError::InvalidDirection {
                line: 8,
                direction: "S".into()
            }
        );
    }

    #[test]
    fn test_parse_multi_character_symbol() {
        let input = format!("{HEADER}q0,ab,qA,a,R\n");

        let error = parse(&input).unwrap_err();
        assert!(matches!(error, NtmError::InvalidSymbol { line: 8, .. }));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let input = format!("{HEADER}q0,\"a,qA,a,R\n");

        let error = parse(&input).unwrap_err();
        assert!(matches!(error, NtmError::ParseError(_)));
        assert!(error.is_malformed());
    }
}
