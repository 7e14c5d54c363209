//! Reader for REACLIB sources.
//!
//! A source is a sequence of chapter lines and three-line sets:
//! ```text
//! 4
//!          he4  c12  o16                       nac2      7.16192e+00
//!  2.546340e+02-1.840970e+00 1.034110e+02-4.205670e+02
//!  6.408740e+01-1.246240e+01 1.373030e+02
//! ```
//! The set header holds up to six nuclei in 5-character fields over columns
//! 5..35, the 6-character label field at column 43 (4-character label,
//! resonance flag, reverse flag) and the Q value after it. Lines that do not
//! follow these columns are read by tokens: exactly the chapter's number of
//! nuclei, the label field, then Q.
//!
//! A single rate file has one chapter line; a library snapshot repeats the
//! chapter line freely. Consecutive sets with the same chapter, nuclei,
//! label and reverse flag form one rate.
use super::rate_api::RateInfo;
use super::reaclib::{Chapter, ReaclibRate, SetFlag, TermSet};
use super::source_lines::{NucleusResolver, SourceLine, parse_field, scan_floats};
use crate::Nuclei::nucleus::Nucleus;
use crate::rate_error::{RateError, Result};
use log::debug;

const FIRST_LINE_FIELDS: [&str; 4] = ["a0", "a1", "a2", "a3"];
const SECOND_LINE_FIELDS: [&str; 3] = ["a4", "a5", "a6"];

/// Parsed header of one set.
struct SetHeader {
    nuclei: Vec<Nucleus>,
    labelprops: String,
    q: f64,
}

/// Sets of one reaction under construction.
struct Group {
    chapter: Chapter,
    reactants: Vec<Nucleus>,
    products: Vec<Nucleus>,
    q: f64,
    sets: Vec<TermSet>,
}

fn is_chapter_line(text: &str) -> bool {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(tok), None) => !tok.contains('.') && tok.chars().all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

const NUCLEI_COLUMNS: std::ops::Range<usize> = 5..35;
const LABEL_COLUMNS: std::ops::Range<usize> = 43..49;

/// True when the line follows the REACLIB column layout: blank lead-in,
/// blank gap before the label field and a label starting at column 43.
fn is_column_header(text: &str) -> bool {
    let bytes = text.as_bytes();
    text.is_ascii()
        && text.len() > LABEL_COLUMNS.end
        && bytes[..NUCLEI_COLUMNS.start].iter().all(|b| *b == b' ')
        && bytes[NUCLEI_COLUMNS.end..LABEL_COLUMNS.start].iter().all(|b| *b == b' ')
        && bytes[LABEL_COLUMNS.start] != b' '
}

fn resolve_all(
    tokens: &[&str],
    line: &SourceLine,
    origin: &str,
    resolver: &mut NucleusResolver,
) -> Result<Vec<Nucleus>> {
    tokens.iter().map(|tok| resolver.resolve(tok, line, origin)).collect()
}

fn nuclei_count_error(line: &SourceLine, origin: &str, chapter: Chapter, found: String) -> RateError {
    RateError::parse(
        origin,
        line.number,
        "nuclei",
        format!(
            "chapter {} expects {} reactant(s) and {} product(s), found {}",
            chapter,
            chapter.n_reactants(),
            chapter.n_products(),
            found
        ),
    )
}

fn parse_column_header(
    line: &SourceLine,
    origin: &str,
    chapter: Chapter,
    resolver: &mut NucleusResolver,
) -> Result<SetHeader> {
    let text = line.text;
    let tokens: Vec<&str> = text[NUCLEI_COLUMNS].split_whitespace().collect();
    let expected = chapter.n_reactants() + chapter.n_products();
    if tokens.len() != expected {
        return Err(nuclei_count_error(line, origin, chapter, format!("{} nuclei", tokens.len())));
    }
    let nuclei = resolve_all(&tokens, line, origin, resolver)?;
    let q = parse_field(&text[LABEL_COLUMNS.end..], line, origin, "Q")?;
    Ok(SetHeader {
        nuclei,
        labelprops: text[LABEL_COLUMNS].to_string(),
        q,
    })
}

/// Hand-written headers: exactly the chapter's nuclei, the label field
/// (one token, or the label and its flags split by a blank), the Q value.
fn parse_token_header(
    line: &SourceLine,
    origin: &str,
    chapter: Chapter,
    resolver: &mut NucleusResolver,
) -> Result<SetHeader> {
    let tokens: Vec<&str> = line.text.split_whitespace().collect();
    let expected = chapter.n_reactants() + chapter.n_products();
    // nuclei, at least one label token, Q
    if tokens.len() < expected + 2 {
        return Err(nuclei_count_error(
            line,
            origin,
            chapter,
            format!("{} token(s) for nuclei, label and Q", tokens.len()),
        ));
    }
    let (body, q_token) = tokens.split_at(tokens.len() - 1);
    let q = parse_field(q_token[0], line, origin, "Q")?;
    let nuclei = resolve_all(&body[..expected], line, origin, resolver)?;

    let label_tokens = &body[expected..];
    if Nucleus::from_name(label_tokens[0]).is_ok() {
        return Err(nuclei_count_error(
            line,
            origin,
            chapter,
            format!("an extra nuclide '{}' after them", label_tokens[0]),
        ));
    }
    let labelprops = match label_tokens {
        [props] => props.to_string(),
        // "nacr v": blank resonance column
        [label, "v"] => format!("{:<4} v", label),
        [label, flags] if flags.len() <= 2 => format!("{:<4}{}", label, flags),
        _ => {
            return Err(RateError::parse(
                origin,
                line.number,
                "label",
                format!("unexpected tokens before the Q value: {}", label_tokens.join(" ")),
            ));
        }
    };
    Ok(SetHeader {
        nuclei,
        labelprops,
        q,
    })
}

fn parse_header(
    line: &SourceLine,
    origin: &str,
    chapter: Chapter,
    resolver: &mut NucleusResolver,
) -> Result<SetHeader> {
    if is_column_header(line.text) {
        parse_column_header(line, origin, chapter, resolver)
    } else {
        parse_token_header(line, origin, chapter, resolver)
    }
}

fn parse_coefficients(
    first: &SourceLine,
    second: &SourceLine,
    origin: &str,
) -> Result<[f64; 7]> {
    let head = scan_floats(first, origin, &FIRST_LINE_FIELDS)?;
    if head.len() != 4 {
        return Err(RateError::parse(
            origin,
            first.number,
            "coefficients",
            format!("expected 4 coefficients (a0..a3), found {}", head.len()),
        ));
    }
    let tail = scan_floats(second, origin, &SECOND_LINE_FIELDS)?;
    if tail.len() != 3 {
        return Err(RateError::parse(
            origin,
            second.number,
            "coefficients",
            format!("expected 3 coefficients (a4..a6), found {}", tail.len()),
        ));
    }
    let mut a = [0.0; 7];
    a[..4].copy_from_slice(&head);
    a[4..].copy_from_slice(&tail);
    for (k, (c, line)) in a
        .iter()
        .zip([first, first, first, first, second, second, second])
        .enumerate()
    {
        if !c.is_finite() {
            return Err(RateError::parse(
                origin,
                line.number,
                &format!("a{}", k),
                "coefficient is not finite",
            ));
        }
    }
    Ok(a)
}

fn finish(group: Group, origin: &str) -> Result<ReaclibRate> {
    let mut info = RateInfo::new(group.reactants, group.products, origin, "");
    info.chapter = Some(group.chapter);
    info.q_value = Some(group.q);
    if let Some(first) = group.sets.first() {
        info.label = first.label.clone();
        info.reverse = first.reverse;
    }
    info.resonant = group.sets.iter().any(|s| s.flag == SetFlag::Resonant);
    info.weak = group.sets.iter().any(|s| s.flag == SetFlag::Weak);
    ReaclibRate::from_sets(info, group.sets)
}

pub(crate) fn parse_reaclib(
    lines: &[SourceLine],
    origin: &str,
    resolver: &mut NucleusResolver,
) -> Result<Vec<ReaclibRate>> {
    let mut chapter: Option<Chapter> = None;
    let mut groups: Vec<Group> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        let trimmed = line.text.trim();
        if is_chapter_line(trimmed) {
            chapter = Some(Chapter::from_code(trimmed).ok_or_else(|| {
                RateError::UnsupportedChapter {
                    origin: origin.to_string(),
                    code: trimmed.to_string(),
                }
            })?);
            i += 1;
            continue;
        }
        let chapter = chapter.ok_or_else(|| {
            RateError::parse(origin, line.number, "chapter", "set found before any chapter line")
        })?;
        let complete = i + 2 < lines.len()
            && !is_chapter_line(lines[i + 1].text.trim())
            && !is_chapter_line(lines[i + 2].text.trim());
        if !complete {
            return Err(RateError::parse(
                origin,
                line.number,
                "set",
                "incomplete set: a header line must be followed by two coefficient lines",
            ));
        }

        let header = parse_header(line, origin, chapter, resolver)?;
        let mut nuclei = header.nuclei;
        let products = nuclei.split_off(chapter.n_reactants());
        let reactants = nuclei;

        let a = parse_coefficients(&lines[i + 1], &lines[i + 2], origin)?;
        let set = TermSet::from_labelprops(a, &header.labelprops).ok_or_else(|| {
            RateError::parse(
                origin,
                line.number,
                "label",
                format!(
                    "'{}' is not a label field (label, flag r/n/w/s, reverse v)",
                    header.labelprops.trim_end()
                ),
            )
        })?;

        let same_reaction = groups.last().is_some_and(|g| {
            g.chapter == chapter
                && g.reactants == reactants
                && g.products == products
                && g.sets[0].label == set.label
                && g.sets[0].reverse == set.reverse
        });
        match groups.last_mut() {
            Some(group) if same_reaction => group.sets.push(set),
            _ => groups.push(Group {
                chapter,
                reactants,
                products,
                q: header.q,
                sets: vec![set],
            }),
        }
        i += 3;
    }
    if groups.is_empty() {
        return Err(RateError::EmptyRate {
            origin: origin.to_string(),
        });
    }
    debug!("'{}': {} REACLIB reaction(s)", origin, groups.len());
    groups.into_iter().map(|g| finish(g, origin)).collect()
}
